// handlers/mod.rs - two security tiers
//
// Public (no auth): /api/auth/*
// Protected (USER or ADMIN token): /api/actor*, /api/film*, /api/user*.
// Mutating protected handlers additionally require ADMIN.

pub mod protected;
pub mod public;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decodes a JSON body. Any syntax or type error is a 400 with the
/// decoder's message.
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(e.to_string()))
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Fallback for known paths hit with a method they don't support.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::FilmRequest;

    #[test]
    fn malformed_json_is_bad_request() {
        let err = decode_body::<FilmRequest>(&Bytes::from_static(b"{\"name\":")).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn wrong_types_are_bad_request() {
        let err = decode_body::<FilmRequest>(&Bytes::from_static(b"{\"rating\":\"ten\"}")).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
