//! Authentication and authorization.
//!
//! Tokens are HS256 JWTs carrying a [`Claims`] payload. Every protected route
//! runs two independent gates: [`policy::require_authenticated`] (401) and
//! [`policy::require_role`] (403).

pub mod password;
pub mod policy;
pub mod token;

use serde::{Deserialize, Serialize};

pub use policy::{authorize, bearer_token, require_authenticated, require_role};
pub use token::{AuthError, Claims, TokenCodec};

/// Permission tier. Stored as a small integer code in `_user.role_id` and in
/// the `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const ADMIN_CODE: i16 = 1;
    pub const USER_CODE: i16 = 2;

    pub const fn code(self) -> i16 {
        match self {
            Role::Admin => Self::ADMIN_CODE,
            Role::User => Self::USER_CODE,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            Self::ADMIN_CODE => Some(Role::Admin),
            Self::USER_CODE => Some(Role::User),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// ADMIN carries every USER capability; USER carries only its own.
    pub const fn satisfies(self, required: Role) -> bool {
        matches!((self, required), (Role::Admin, _) | (Role::User, Role::User))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_codes_round_trip() {
        assert_eq!(Role::from_code(1), Some(Role::Admin));
        assert_eq!(Role::from_code(2), Some(Role::User));
        assert_eq!(Role::from_code(0), None);
        assert_eq!(Role::from_code(3), None);
        assert_eq!(Role::Admin.code(), 1);
        assert_eq!(Role::User.code(), 2);
    }

    #[test]
    fn admin_satisfies_both_tiers_user_only_its_own() {
        assert!(Role::Admin.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::User));
        assert!(Role::User.satisfies(Role::User));
        assert!(!Role::User.satisfies(Role::Admin));
    }

    #[test]
    fn role_names_are_upper_case() {
        assert_eq!(Role::from_name("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_name("admin"), None);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }
}
