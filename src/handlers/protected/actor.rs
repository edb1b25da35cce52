use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, Path, State},
    response::Json,
};

use crate::auth::Role;
use crate::database::models::{Actor, ActorRequest};
use crate::error::ApiError;
use crate::handlers::decode_body;
use crate::middleware::{AuthUser, Created};
use crate::state::AppState;

/// GET /api/actor
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Actor>>, ApiError> {
    Ok(Json(state.actors.list().await?))
}

/// GET /api/actor/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Actor>, ApiError> {
    Ok(Json(state.actors.get(id).await?))
}

/// POST /api/actor - all scalar fields required, `filmsId` optional
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Created, ApiError> {
    user.require(Role::Admin)?;

    let request: ActorRequest = decode_body(&body)?;
    let fields = request.complete().map_err(ApiError::BadRequest)?;
    let films_id = request.films_id.as_deref().unwrap_or_default();

    Ok(Created(state.actors.create(&fields, films_id).await?))
}

/// PUT /api/actor/:id - replace every scalar field
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<Actor>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: ActorRequest = decode_body(&body)?;
    let fields = request.complete().map_err(ApiError::BadRequest)?;

    Ok(Json(state.actors.put(id, &fields, request.films_id.as_deref()).await?))
}

/// PATCH /api/actor/:id - update only the fields present
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<Actor>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: ActorRequest = decode_body(&body)?;
    request.validate().map_err(ApiError::BadRequest)?;

    Ok(Json(state.actors.patch(id, &request).await?))
}

/// DELETE /api/actor/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<(), ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    state.actors.delete(id).await?;
    Ok(())
}
