use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::{bearer_token, require_authenticated, require_role, Role};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated principal extracted from the bearer token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub role: Role,
}

impl AuthUser {
    /// Second-tier gate for routes that need more than the USER baseline.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.role.satisfies(role) {
            Ok(())
        } else {
            warn!("User {} with role {} denied {} access", self.id, self.role, role);
            Err(ApiError::Forbidden("Forbidden".to_string()))
        }
    }
}

/// Rejects requests without a valid token (401) or without at least USER
/// role (403), then injects [`AuthUser`] into request extensions.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = bearer_token(header);

    let claims = require_authenticated(&state.tokens, token).map_err(|e| {
        warn!("Rejected request to {}: {}", request.uri().path(), e);
        e
    })?;
    let role = require_role(&claims, Role::User).map_err(|e| {
        warn!("Token for user {} carries unknown role code {}", claims.id, claims.role);
        e
    })?;

    request.extensions_mut().insert(AuthUser { id: claims.id, role });

    Ok(next.run(request).await)
}
