use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Extension, Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::auth::Role;
use crate::database::models::{Film, FilmRequest};
use crate::error::ApiError;
use crate::filter::SearchParams;
use crate::handlers::decode_body;
use crate::middleware::{AuthUser, Created};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// `<field>.<asc|desc>`, defaults to `rating.desc`
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
}

/// GET /api/film?sortBy=
pub async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Result<Json<Vec<Film>>, ApiError> {
    Ok(Json(state.films.list(query.sort_by.as_deref()).await?))
}

/// GET /api/film/search?name= or ?actor=
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Film>>, ApiError> {
    Ok(Json(state.films.search(&params).await?))
}

/// GET /api/film/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Film>, ApiError> {
    Ok(Json(state.films.get(id).await?))
}

/// POST /api/film
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Created, ApiError> {
    user.require(Role::Admin)?;

    let request: FilmRequest = decode_body(&body)?;
    let fields = request.complete().map_err(ApiError::BadRequest)?;
    let actors_id = request.actors_id.as_deref().unwrap_or_default();

    Ok(Created(state.films.create(&fields, actors_id).await?))
}

/// PUT /api/film/:id
pub async fn put(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<Film>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: FilmRequest = decode_body(&body)?;
    let fields = request.complete().map_err(ApiError::BadRequest)?;

    Ok(Json(state.films.put(id, &fields, request.actors_id.as_deref()).await?))
}

/// PATCH /api/film/:id
pub async fn patch(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
    body: Bytes,
) -> Result<Json<Film>, ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    let request: FilmRequest = decode_body(&body)?;
    request.validate().map_err(ApiError::BadRequest)?;

    Ok(Json(state.films.patch(id, &request).await?))
}

/// DELETE /api/film/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<(), ApiError> {
    user.require(Role::Admin)?;
    let Path(id) = path?;

    state.films.delete(id).await?;
    Ok(())
}
