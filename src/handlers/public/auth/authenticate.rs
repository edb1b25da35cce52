use axum::{body::Bytes, extract::State};

use crate::database::models::Credentials;
use crate::error::ApiError;
use crate::handlers::decode_body;
use crate::middleware::IssuedToken;
use crate::state::AppState;

/// POST /api/auth/authenticate - exchange credentials for a token
pub async fn authenticate_post(State(state): State<AppState>, body: Bytes) -> Result<IssuedToken, ApiError> {
    let credentials: Credentials = decode_body(&body)?;
    credentials.validate_login().map_err(ApiError::BadRequest)?;

    let token = state.users.login(&credentials).await?;
    Ok(IssuedToken::authenticated(token))
}
