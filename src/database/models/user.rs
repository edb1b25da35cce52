use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Validation;
use crate::auth::Role;
use crate::database::patch::UpdateBuilder;

pub const USERNAME_MIN_CHARS: usize = 2;
/// Column width of `_user.username`
pub const USERNAME_MAX_CHARS: usize = 255;
pub const PASSWORD_MIN_CHARS: usize = 8;
/// Upper bound at registration
pub const REGISTER_PASSWORD_MAX_CHARS: usize = 16;
/// Upper bound on login and user updates
pub const PASSWORD_MAX_CHARS: usize = 20;

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

/// Stored account, used for credential checks.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub role_id: i16,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub username: String,
    pub role_id: i16,
}

impl UserRow {
    pub fn into_user(self) -> Option<User> {
        Some(User {
            id: self.id,
            username: self.username,
            role: Role::from_code(self.role_id)?,
        })
    }
}

/// Body of `/api/auth/register` and `/api/auth/authenticate`.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    fn validate_with_max(&self, password_max: usize) -> Validation {
        let username_len = self.username.chars().count();
        let password_len = self.password.chars().count();
        if !(USERNAME_MIN_CHARS..=USERNAME_MAX_CHARS).contains(&username_len)
            || !(PASSWORD_MIN_CHARS..=password_max).contains(&password_len)
        {
            return Err(format!(
                "Invalid request body. Username length must be [{}, {}], password length must be [{}, {}]",
                USERNAME_MIN_CHARS, USERNAME_MAX_CHARS, PASSWORD_MIN_CHARS, password_max
            ));
        }
        Ok(())
    }

    pub fn validate_registration(&self) -> Validation {
        self.validate_with_max(REGISTER_PASSWORD_MAX_CHARS)
    }

    pub fn validate_login(&self) -> Validation {
        self.validate_with_max(PASSWORD_MAX_CHARS)
    }
}

/// Sparse user payload for put and patch. `role` is a role name.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl std::fmt::Debug for UserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRequest")
            .field("username", &self.username)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl UserRequest {
    pub fn validate(&self) -> Validation {
        if let Some(username) = &self.username {
            let len = username.chars().count();
            if len < USERNAME_MIN_CHARS {
                return Err(format!("username length must be greater than {}", USERNAME_MIN_CHARS));
            }
            if len > USERNAME_MAX_CHARS {
                return Err(format!("username length must be at most {}", USERNAME_MAX_CHARS));
            }
        }
        if let Some(password) = &self.password {
            let len = password.chars().count();
            if !(PASSWORD_MIN_CHARS..=PASSWORD_MAX_CHARS).contains(&len) {
                return Err(format!(
                    "password length must be in [{}; {}]",
                    PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS
                ));
            }
        }
        Ok(())
    }

    pub fn require_complete(&self) -> Validation {
        self.validate()?;
        for (present, field) in [
            (self.username.is_some(), "username"),
            (self.password.is_some(), "password"),
            (self.role.is_some(), "role"),
        ] {
            if !present {
                return Err(format!("{} is required", field));
            }
        }
        Ok(())
    }
}

/// Already-hashed, already-resolved changes handed to the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    pub fn updates(&self) -> UpdateBuilder {
        UpdateBuilder::new("_user")
            .set("username", self.username.clone())
            .set("password", self.password_hash.clone())
            .set("role_id", self.role.map(|r| r.code()))
    }
}
