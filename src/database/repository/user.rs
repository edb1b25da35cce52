use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use super::{delete_by_id, lock_existing, unique_violation, UserRepository};
use crate::auth::Role;
use crate::database::manager::DatabaseError;
use crate::database::models::{User, UserChanges, UserRecord, UserRow};

const USERNAME_TAKEN: &str = "User with such username already exists";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_user(row: UserRow) -> Result<User, DatabaseError> {
    let code = row.role_id;
    row.into_user()
        .ok_or_else(|| DatabaseError::QueryError(format!("unknown role code {}", code)))
}

async fn fetch_one(conn: &mut PgConnection, id: i32) -> Result<User, DatabaseError> {
    let row = sqlx::query_as::<_, UserRow>("SELECT id, username, role_id FROM _user WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    to_user(row)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get(&self, id: i32) -> Result<User, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let user = fetch_one(&mut conn, id).await?;
        info!("Get user with id {}", id);
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT id, username, role_id FROM _user ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let users = rows.into_iter().map(to_user).collect::<Result<Vec<_>, _>>()?;
        info!("Get {} users", users.len());
        Ok(users)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, DatabaseError> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT id, username, password, role_id FROM _user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn create(&self, username: &str, password_hash: &str, role: Role) -> Result<i32, DatabaseError> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO _user (username, password, role_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.code())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, USERNAME_TAKEN))?;
        info!("Created user with id {} and role {}", id, role);
        Ok(id)
    }

    async fn put(&self, id: i32, username: &str, password_hash: &str, role: Role) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>(
            "UPDATE _user SET username = $1, password = $2, role_id = $3 WHERE id = $4 RETURNING id",
        )
        .bind(username)
        .bind(password_hash)
        .bind(role.code())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| unique_violation(e, USERNAME_TAKEN))?
        .ok_or(DatabaseError::NotFound)?;
        let user = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Put user with id {}", id);
        Ok(user)
    }

    async fn patch(&self, id: i32, changes: &UserChanges) -> Result<User, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        match changes.updates().build(id) {
            Some(stmt) => {
                stmt.execute(&mut tx)
                    .await
                    .map_err(|e| unique_violation(e, USERNAME_TAKEN))?
                    .ok_or(DatabaseError::NotFound)?;
            }
            None => lock_existing(&mut tx, "_user", id).await?,
        }
        let user = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Patch user with id {}", id);
        Ok(user)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "_user", id).await?;
        info!("Deleted user with id {}", id);
        Ok(())
    }
}
