use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors surfaced by the repositories. Services pass these through unchanged.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    /// Zero rows matched the requested id
    #[error("entity not found")]
    NotFound,

    /// A junction insert referenced a counterpart id that does not exist
    #[error("{0} with such id does not exist")]
    MissingReference(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Migration(#[from] MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Business-rule failures the client can act on, as opposed to
    /// infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::NotFound | DatabaseError::MissingReference(_) | DatabaseError::Conflict(_)
        )
    }
}

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the connection pool. Every session gets a server-side
/// `statement_timeout` so no query outlives its request by much.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config.url.as_deref().ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let options = PgConnectOptions::from_str(url)?
        .options([("statement_timeout", config.statement_timeout_ms.to_string())]);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect_with(options)
        .await?;

    info!("Created database pool (max {} connections)", config.max_connections);
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_distinguished_from_infrastructure() {
        assert!(DatabaseError::NotFound.is_client_error());
        assert!(DatabaseError::MissingReference("film").is_client_error());
        assert!(DatabaseError::Conflict("taken".into()).is_client_error());
        assert!(!DatabaseError::QueryError("boom".into()).is_client_error());
        assert!(!DatabaseError::Sqlx(sqlx::Error::RowNotFound).is_client_error());
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(DatabaseError::NotFound.to_string(), "entity not found");
        assert_eq!(
            DatabaseError::MissingReference("film").to_string(),
            "film with such id does not exist"
        );
    }

    #[tokio::test]
    async fn connect_without_url_is_a_config_error() {
        let config = crate::config::AppConfig::for_tests("k").database;
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConfigMissing("DATABASE_URL")));
    }
}
