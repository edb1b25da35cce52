//! Two-tier role gate.
//!
//! [`require_authenticated`] answers "is this a token we issued?" and maps to
//! 401. [`require_role`] answers "may this principal do that?" and maps to
//! 403. A role check never runs on claims that failed authentication.

use super::token::{AuthError, Claims, TokenCodec};
use super::Role;

/// Extract the token from an `Authorization` header value.
///
/// Anything other than exactly `Bearer <token>` yields an empty string, which
/// then fails decoding like any other invalid token.
pub fn bearer_token(header: Option<&str>) -> &str {
    let Some(value) = header else { return "" };
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => "",
    }
}

pub fn require_authenticated(codec: &TokenCodec, token: &str) -> Result<Claims, AuthError> {
    codec.decode(token)
}

/// Role check over already-authenticated claims. Unknown role codes are
/// denied.
pub fn require_role(claims: &Claims, required: Role) -> Result<Role, AuthError> {
    match claims.role() {
        Some(role) if role.satisfies(required) => Ok(role),
        _ => Err(AuthError::Forbidden),
    }
}

/// Both gates in order: validity first, then role.
pub fn authorize(codec: &TokenCodec, token: &str, required: Role) -> Result<Claims, AuthError> {
    let claims = require_authenticated(codec, token)?;
    require_role(&claims, required)?;
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn codec() -> TokenCodec {
        TokenCodec::new(b"policy-test-secret", 600, true)
    }

    fn claims(role: i16) -> Claims {
        claims_with_code(role.into())
    }

    fn claims_with_code(role: i32) -> Claims {
        Claims::new(1, role, 600)
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), "abc.def.ghi");
        assert_eq!(bearer_token(Some("bearer abc")), "abc");
        assert_eq!(bearer_token(Some("Basic abc")), "");
        assert_eq!(bearer_token(Some("Bearer")), "");
        assert_eq!(bearer_token(Some("Bearer a b")), "");
        assert_eq!(bearer_token(Some("")), "");
        assert_eq!(bearer_token(None), "");
    }

    #[test]
    fn admin_gate_only_admits_admin_code() {
        assert!(require_role(&claims(Role::ADMIN_CODE), Role::Admin).is_ok());
        assert_eq!(require_role(&claims(Role::USER_CODE), Role::Admin), Err(AuthError::Forbidden));
        assert_eq!(require_role(&claims(0), Role::Admin), Err(AuthError::Forbidden));
    }

    #[test]
    fn user_gate_admits_admin_and_user_codes() {
        assert_eq!(require_role(&claims(Role::ADMIN_CODE), Role::User), Ok(Role::Admin));
        assert_eq!(require_role(&claims(Role::USER_CODE), Role::User), Ok(Role::User));
        assert_eq!(require_role(&claims(3), Role::User), Err(AuthError::Forbidden));
        assert_eq!(require_role(&claims_with_code(65_537), Role::User), Err(AuthError::Forbidden));
    }

    #[test]
    fn forged_admin_token_fails_user_gate_as_unauthenticated() {
        // An admin role code must not bypass signature validation.
        let forged = encode(
            &Header::default(),
            &claims(Role::ADMIN_CODE),
            &EncodingKey::from_secret(b"attacker-key"),
        )
        .unwrap();

        assert_eq!(authorize(&codec(), &forged, Role::User), Err(AuthError::InvalidToken));
        assert_eq!(authorize(&codec(), &forged, Role::Admin), Err(AuthError::InvalidToken));
    }

    #[test]
    fn valid_tokens_pass_gates_by_role() {
        let codec = codec();
        let admin = codec.issue(1, Role::Admin).unwrap();
        let user = codec.issue(2, Role::User).unwrap();

        assert!(authorize(&codec, &admin, Role::Admin).is_ok());
        assert!(authorize(&codec, &admin, Role::User).is_ok());
        assert!(authorize(&codec, &user, Role::User).is_ok());
        assert_eq!(authorize(&codec, &user, Role::Admin), Err(AuthError::Forbidden));
    }

    #[test]
    fn missing_header_is_unauthenticated_not_forbidden() {
        let token = bearer_token(None);
        assert_eq!(authorize(&codec(), token, Role::User), Err(AuthError::InvalidToken));
    }
}
