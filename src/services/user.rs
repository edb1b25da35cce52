use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Role, TokenCodec};
use crate::database::models::{Credentials, User, UserChanges, UserRequest};
use crate::database::{DatabaseError, UserRepository};

use super::ServiceError;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    tokens: Arc<TokenCodec>,
    registration_role: Role,
}

fn parse_role(name: &str) -> Result<Role, ServiceError> {
    Role::from_name(name).ok_or_else(|| ServiceError::UnknownRole(name.to_string()))
}

/// Runs on the blocking pool.
async fn hash(password: &str) -> Result<String, ServiceError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!("Password hashing task failed: {}", e);
            ServiceError::PasswordHash
        })?
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ServiceError::PasswordHash
        })
}

async fn verify(password: &str, stored_hash: &str) -> Result<bool, ServiceError> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| {
            error!("Password verification task failed: {}", e);
            ServiceError::PasswordHash
        })?
        .map_err(|e| {
            error!("Stored password hash is unreadable: {}", e);
            ServiceError::PasswordHash
        })
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, tokens: Arc<TokenCodec>, registration_role: Role) -> Self {
        Self { repo, tokens, registration_role }
    }

    /// Creates an account with the configured registration role and returns
    /// a token for it.
    pub async fn register(&self, credentials: &Credentials) -> Result<String, ServiceError> {
        let password_hash = hash(&credentials.password).await?;
        let id = self
            .repo
            .create(&credentials.username, &password_hash, self.registration_role)
            .await?;
        info!("Registered user {} with role {}", id, self.registration_role);
        Ok(self.tokens.issue(id, self.registration_role)?)
    }

    /// Unknown username and wrong password are indistinguishable to the caller.
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ServiceError> {
        let Some(record) = self.repo.find_by_username(&credentials.username).await? else {
            warn!("Login failed: unknown username");
            return Err(ServiceError::InvalidCredentials);
        };

        if !verify(&credentials.password, &record.password).await? {
            warn!("Login failed for user {}", record.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let role = Role::from_code(record.role_id).ok_or_else(|| {
            DatabaseError::QueryError(format!("unknown role code {}", record.role_id))
        })?;
        info!("User {} authenticated", record.id);
        Ok(self.tokens.issue(record.id, role)?)
    }

    pub async fn get(&self, id: i32) -> Result<User, ServiceError> {
        Ok(self.repo.get(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.repo.list().await?)
    }

    /// Expects a request that already passed `require_complete`.
    pub async fn put(&self, id: i32, request: &UserRequest) -> Result<User, ServiceError> {
        let changes = self.resolve(request).await?;
        match &changes {
            UserChanges { username: Some(username), password_hash: Some(password_hash), role: Some(role) } => {
                Ok(self.repo.put(id, username, password_hash, *role).await?)
            }
            _ => Ok(self.repo.patch(id, &changes).await?),
        }
    }

    pub async fn patch(&self, id: i32, request: &UserRequest) -> Result<User, ServiceError> {
        let changes = self.resolve(request).await?;
        Ok(self.repo.patch(id, &changes).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        Ok(self.repo.delete(id).await?)
    }

    /// Role names become codes and passwords become hashes. The role is
    /// checked first so a bad role never costs a hash.
    async fn resolve(&self, request: &UserRequest) -> Result<UserChanges, ServiceError> {
        let role = request.role.as_deref().map(parse_role).transpose()?;
        let password_hash = match &request.password {
            Some(password) => Some(hash(password).await?),
            None => None,
        };
        Ok(UserChanges { username: request.username.clone(), password_hash, role })
    }
}
