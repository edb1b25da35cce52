use axum::{body::Bytes, extract::State};

use crate::database::models::Credentials;
use crate::error::ApiError;
use crate::handlers::decode_body;
use crate::middleware::IssuedToken;
use crate::state::AppState;

/// POST /api/auth/register - create an account and return its token
pub async fn register_post(State(state): State<AppState>, body: Bytes) -> Result<IssuedToken, ApiError> {
    let credentials: Credentials = decode_body(&body)?;
    credentials.validate_registration().map_err(ApiError::BadRequest)?;

    let token = state.users.register(&credentials).await?;
    Ok(IssuedToken::registered(token))
}
