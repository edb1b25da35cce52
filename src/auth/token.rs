use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Role;
use crate::config::SecurityConfig;

/// Signed payload of an access token. Parsed fresh on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: `_user.id`
    pub id: i32,
    /// Role code, see [`Role::code`]. Wider than the stored code so any
    /// signed integer decodes and is judged by the role gate instead.
    pub role: i32,
    pub iat: i64,
    /// Absolute expiry, seconds since epoch
    pub exp: i64,
}

impl Claims {
    pub fn new(subject_id: i32, role_code: i32, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: subject_id,
            role: role_code,
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// `None` when the token carries a code outside the closed role set.
    pub fn role(&self) -> Option<Role> {
        i16::try_from(self.role).ok().and_then(Role::from_code)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid JWT token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("Can not create JWT token")]
    TokenGeneration,
}

/// Issues and verifies HS256 tokens with a key fixed at construction.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: &[u8], ttl_secs: i64, enforce_expiry: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = enforce_expiry;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.as_bytes(),
            security.jwt_expiry_secs,
            security.enforce_token_expiry,
        )
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Mint a token for `subject_id` with the configured lifetime.
    pub fn issue(&self, subject_id: i32, role: Role) -> Result<String, AuthError> {
        self.issue_with_ttl(subject_id, role.code().into(), self.ttl_secs)
    }

    pub fn issue_with_ttl(&self, subject_id: i32, role_code: i32, ttl_secs: i64) -> Result<String, AuthError> {
        let claims = Claims::new(subject_id, role_code, ttl_secs);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!("JWT generation failed for user {}: {}", subject_id, e);
            AuthError::TokenGeneration
        })
    }

    /// Verify signature, algorithm and (when enforced) expiry.
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected JWT: {}", e);
                AuthError::InvalidToken
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_secs", &self.ttl_secs)
            .field("validate_exp", &self.validation.validate_exp)
            .finish_non_exhaustive()
    }
}
