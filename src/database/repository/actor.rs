use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use super::{delete_by_id, lock_existing, ActorRepository};
use crate::database::aggregate::Aggregator;
use crate::database::manager::DatabaseError;
use crate::database::models::{Actor, ActorFields, ActorFilmRow, ActorRequest};
use crate::database::relations::ACTOR_FILMS;

const SELECT_ACTORS: &str = "SELECT actor.id, actor.name, actor.sex, actor.birthday, actor_film.film_id \
     FROM actor LEFT JOIN actor_film ON actor.id = actor_film.actor_id";

#[derive(Clone)]
pub struct PgActorRepository {
    pool: PgPool,
}

impl PgActorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn fetch_one(conn: &mut PgConnection, id: i32) -> Result<Actor, DatabaseError> {
    let sql = format!("{} WHERE actor.id = $1 ORDER BY actor_film.film_id", SELECT_ACTORS);
    let rows = sqlx::query_as::<_, ActorFilmRow>(&sql).bind(id).fetch(conn);
    Aggregator::single(id).consume(rows).await?.finish_one()
}

#[async_trait]
impl ActorRepository for PgActorRepository {
    async fn get(&self, id: i32) -> Result<Actor, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let actor = fetch_one(&mut conn, id).await?;
        info!("Get actor with id {}", id);
        Ok(actor)
    }

    async fn list(&self) -> Result<Vec<Actor>, DatabaseError> {
        let sql = format!("{} ORDER BY actor.id, actor_film.film_id", SELECT_ACTORS);
        let rows = sqlx::query_as::<_, ActorFilmRow>(&sql).fetch(&self.pool);
        let actors = Aggregator::all().consume(rows).await?.finish();
        info!("Get {} actors", actors.len());
        Ok(actors)
    }

    async fn create(&self, fields: &ActorFields, films_id: &[i32]) -> Result<i32, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>("INSERT INTO actor (name, sex, birthday) VALUES ($1, $2, $3) RETURNING id")
            .bind(&fields.name)
            .bind(&fields.sex)
            .bind(fields.birthday)
            .fetch_one(&mut *tx)
            .await?;
        ACTOR_FILMS.insert(&mut tx, id, films_id).await?;

        tx.commit().await?;
        info!("Created actor with id {}", id);
        Ok(id)
    }

    async fn put(&self, id: i32, fields: &ActorFields, films_id: Option<&[i32]>) -> Result<Actor, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>("UPDATE actor SET name = $1, sex = $2, birthday = $3 WHERE id = $4 RETURNING id")
            .bind(&fields.name)
            .bind(&fields.sex)
            .bind(fields.birthday)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DatabaseError::NotFound)?;
        ACTOR_FILMS.replace(&mut tx, id, films_id).await?;
        let actor = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Put actor with id {}", id);
        Ok(actor)
    }

    async fn patch(&self, id: i32, request: &ActorRequest) -> Result<Actor, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        match request.updates().build(id) {
            Some(stmt) => {
                stmt.execute(&mut tx).await?.ok_or(DatabaseError::NotFound)?;
            }
            None => lock_existing(&mut tx, "actor", id).await?,
        }
        ACTOR_FILMS.replace(&mut tx, id, request.films_id.as_deref()).await?;
        let actor = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Patch actor with id {}", id);
        Ok(actor)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "actor", id).await?;
        info!("Deleted actor with id {}", id);
        Ok(())
    }
}
