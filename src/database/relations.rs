//! Maintenance of the `actor_film` junction from either side.

use sqlx::PgConnection;
use tracing::debug;

use super::manager::DatabaseError;

/// One direction of the actor/film relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    owner_column: &'static str,
    counterpart_column: &'static str,
    /// Entity name used in "<entity> with such id does not exist"
    counterpart: &'static str,
}

pub const ACTOR_FILMS: Junction = Junction {
    owner_column: "actor_id",
    counterpart_column: "film_id",
    counterpart: "film",
};

pub const FILM_ACTORS: Junction = Junction {
    owner_column: "film_id",
    counterpart_column: "actor_id",
    counterpart: "actor",
};

impl Junction {
    fn delete_sql(&self) -> String {
        format!("DELETE FROM actor_film WHERE {} = $1", self.owner_column)
    }

    fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO actor_film ({}, {}) SELECT $1, UNNEST($2::int4[])",
            self.owner_column, self.counterpart_column
        )
    }

    /// Inserts one junction row per distinct id. Callers own the
    /// transaction; an unknown id fails the whole insert.
    pub async fn insert(&self, conn: &mut PgConnection, owner_id: i32, ids: &[i32]) -> Result<(), DatabaseError> {
        let ids = dedup(ids);
        if ids.is_empty() {
            return Ok(());
        }

        sqlx::query(&self.insert_sql())
            .bind(owner_id)
            .bind(ids)
            .execute(conn)
            .await
            .map_err(|e| self.map_insert_error(e))?;
        Ok(())
    }

    /// Replaces the owner's link set. `None` leaves it untouched, an empty
    /// slice clears it.
    pub async fn replace(&self, conn: &mut PgConnection, owner_id: i32, ids: Option<&[i32]>) -> Result<(), DatabaseError> {
        let Some(ids) = ids else { return Ok(()) };

        let removed = sqlx::query(&self.delete_sql())
            .bind(owner_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        debug!("Cleared {} {} links for {} {}", removed, self.counterpart, self.owner_column, owner_id);

        self.insert(conn, owner_id, ids).await
    }

    fn map_insert_error(&self, e: sqlx::Error) -> DatabaseError {
        match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                DatabaseError::MissingReference(self.counterpart)
            }
            _ => e.into(),
        }
    }
}

/// Distinct ids in first-appearance order.
pub fn dedup(ids: &[i32]) -> Vec<i32> {
    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}
