//! Repository seams. Services depend on these traits; the Postgres
//! implementations live in the submodules.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::auth::Role;
use crate::database::manager::DatabaseError;
use crate::database::models::{
    Actor, ActorFields, ActorRequest, Film, FilmFields, FilmRequest, User, UserChanges, UserRecord,
};
use crate::filter::{FilmSearch, FilmSort};

pub mod actor;
pub mod film;
pub mod user;

pub use actor::PgActorRepository;
pub use film::PgFilmRepository;
pub use user::PgUserRepository;

#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn get(&self, id: i32) -> Result<Actor, DatabaseError>;

    async fn list(&self) -> Result<Vec<Actor>, DatabaseError>;

    /// Inserts the actor and its film links atomically, returning the new id.
    async fn create(&self, fields: &ActorFields, films_id: &[i32]) -> Result<i32, DatabaseError>;

    /// Overwrites every scalar field; `films_id: None` keeps existing links.
    async fn put(&self, id: i32, fields: &ActorFields, films_id: Option<&[i32]>) -> Result<Actor, DatabaseError>;

    async fn patch(&self, id: i32, request: &ActorRequest) -> Result<Actor, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait FilmRepository: Send + Sync {
    async fn get(&self, id: i32) -> Result<Film, DatabaseError>;

    async fn list(&self, sort: FilmSort) -> Result<Vec<Film>, DatabaseError>;

    async fn search(&self, search: &FilmSearch) -> Result<Vec<Film>, DatabaseError>;

    async fn create(&self, fields: &FilmFields, actors_id: &[i32]) -> Result<i32, DatabaseError>;

    async fn put(&self, id: i32, fields: &FilmFields, actors_id: Option<&[i32]>) -> Result<Film, DatabaseError>;

    async fn patch(&self, id: i32, request: &FilmRequest) -> Result<Film, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, id: i32) -> Result<User, DatabaseError>;

    async fn list(&self) -> Result<Vec<User>, DatabaseError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] when the username is taken.
    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<i32, DatabaseError>;

    async fn put(&self, id: i32, username: &str, password_hash: &str, role: Role) -> Result<User, DatabaseError>;

    async fn patch(&self, id: i32, changes: &UserChanges) -> Result<User, DatabaseError>;

    async fn delete(&self, id: i32) -> Result<(), DatabaseError>;
}

/// Locks the row for the rest of the transaction, or reports it missing.
pub(crate) async fn lock_existing(conn: &mut PgConnection, table: &'static str, id: i32) -> Result<(), DatabaseError> {
    let sql = format!("SELECT id FROM {} WHERE id = $1 FOR UPDATE", table);
    sqlx::query_scalar::<_, i32>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?
        .map(|_| ())
        .ok_or(DatabaseError::NotFound)
}

pub(crate) async fn delete_by_id<'e, E>(executor: E, table: &'static str, id: i32) -> Result<(), DatabaseError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!("DELETE FROM {} WHERE id = $1", table);
    let result = sqlx::query(&sql).bind(id).execute(executor).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound);
    }
    Ok(())
}

/// Maps a unique-key violation to a client-facing conflict message.
pub(crate) fn unique_violation(e: sqlx::Error, message: &str) -> DatabaseError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => DatabaseError::Conflict(message.to_string()),
        _ => e.into(),
    }
}
