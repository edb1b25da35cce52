use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, Path, State},
    response::Json,
};

use crate::auth::Role;
use crate::database::models::{User, UserRequest};
use crate::error::ApiError;
use crate::handlers::decode_body;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /api/user
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list().await?))
}

/// GET /api/user/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get(id).await?))
}

/// PUT /api/user/:id - username, password and role all required
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: UserRequest = decode_body(&body)?;
    request.require_complete().map_err(ApiError::BadRequest)?;

    Ok(Json(state.users.put(id, &request).await?))
}

/// PATCH /api/user/:id
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: UserRequest = decode_body(&body)?;
    request.validate().map_err(ApiError::BadRequest)?;

    Ok(Json(state.users.patch(id, &request).await?))
}

/// DELETE /api/user/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<(), ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    state.users.delete(id).await?;
    Ok(())
}
