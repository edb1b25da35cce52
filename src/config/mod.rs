use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::auth::Role;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Only `serve` and `migrate` need it.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Pool acquire timeout in seconds
    pub connection_timeout: u64,
    /// Server-side `statement_timeout`, bounds every query a request issues
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_secs: i64,
    pub enforce_token_expiry: bool,
    pub registration_role: Role,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        if config.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_PRIVATE_KEY"));
        }

        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_STATEMENT_TIMEOUT_MS") {
            self.database.statement_timeout_ms = v.parse().unwrap_or(self.database.statement_timeout_ms);
        }

        // API overrides
        if let Some(v) = env::var("API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_PRIVATE_KEY") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRATION") {
            self.security.jwt_expiry_secs = v.parse().unwrap_or(self.security.jwt_expiry_secs);
        }
        if let Ok(v) = env::var("SECURITY_ENFORCE_TOKEN_EXPIRY") {
            self.security.enforce_token_expiry = v.parse().unwrap_or(self.security.enforce_token_expiry);
        }
        if let Ok(v) = env::var("SECURITY_REGISTRATION_ROLE") {
            self.security.registration_role = Role::from_name(&v).ok_or(ConfigError::Invalid {
                name: "SECURITY_REGISTRATION_ROLE",
                value: v,
            })?;
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                statement_timeout_ms: 5_000,
            },
            api: ApiConfig {
                port: 8080,
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 24 * 60 * 60,
                enforce_token_expiry: true,
                registration_role: Role::User,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                statement_timeout_ms: 5_000,
            },
            api: ApiConfig {
                port: 8080,
                request_timeout_secs: 15,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 12 * 60 * 60,
                enforce_token_expiry: true,
                registration_role: Role::User,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                statement_timeout_ms: 3_000,
            },
            api: ApiConfig {
                port: 8080,
                request_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_secs: 4 * 60 * 60,
                enforce_token_expiry: true,
                registration_role: Role::User,
            },
        }
    }

    /// Development preset with a fixed signing key, for tests and local tooling
    pub fn for_tests(secret: &str) -> Self {
        let mut config = Self::development();
        config.security.jwt_secret = secret.to_string();
        config
    }
}
