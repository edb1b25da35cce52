use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use super::{delete_by_id, lock_existing, FilmRepository};
use crate::database::aggregate::Aggregator;
use crate::database::manager::DatabaseError;
use crate::database::models::{Film, FilmActorRow, FilmFields, FilmRequest};
use crate::database::relations::FILM_ACTORS;
use crate::filter::{FilmSearch, FilmSort};

const SELECT_FILMS: &str = "SELECT film.id, film.name, film.description, film.release_date, film.rating, \
     actor_film.actor_id FROM film LEFT JOIN actor_film ON film.id = actor_film.film_id";

#[derive(Clone)]
pub struct PgFilmRepository {
    pool: PgPool,
}

impl PgFilmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_all(&self, sql: &str, pattern: Option<&str>) -> Result<Vec<Film>, DatabaseError> {
        let mut query = sqlx::query_as::<_, FilmActorRow>(sql);
        if let Some(pattern) = pattern {
            query = query.bind(pattern);
        }
        let rows = query.fetch(&self.pool);
        Ok(Aggregator::all().consume(rows).await?.finish())
    }
}

async fn fetch_one(conn: &mut PgConnection, id: i32) -> Result<Film, DatabaseError> {
    let sql = format!("{} WHERE film.id = $1 ORDER BY actor_film.actor_id", SELECT_FILMS);
    let rows = sqlx::query_as::<_, FilmActorRow>(&sql).bind(id).fetch(conn);
    Aggregator::single(id).consume(rows).await?.finish_one()
}

/// Statement for a search. The prefix is always bound as `$1`.
fn search_sql(search: &FilmSearch) -> String {
    match search {
        FilmSearch::ByName(_) => format!(
            "{} WHERE film.name LIKE $1 ORDER BY film.id, actor_film.actor_id",
            SELECT_FILMS
        ),
        // Filter films by actor first, then join every actor of each match.
        FilmSearch::ByActor(_) => format!(
            "{} WHERE film.id IN (SELECT af.film_id FROM actor_film af \
             JOIN actor ON actor.id = af.actor_id WHERE actor.name LIKE $1) \
             ORDER BY film.id, actor_film.actor_id",
            SELECT_FILMS
        ),
    }
}

#[async_trait]
impl FilmRepository for PgFilmRepository {
    async fn get(&self, id: i32) -> Result<Film, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        let film = fetch_one(&mut conn, id).await?;
        info!("Get film with id {}", id);
        Ok(film)
    }

    async fn list(&self, sort: FilmSort) -> Result<Vec<Film>, DatabaseError> {
        let sql = format!("{} {}, actor_film.actor_id", SELECT_FILMS, sort.order_by());
        let films = self.fetch_all(&sql, None).await?;
        info!("Get {} films sorted by {:?} {:?}", films.len(), sort.field, sort.direction);
        Ok(films)
    }

    async fn search(&self, search: &FilmSearch) -> Result<Vec<Film>, DatabaseError> {
        let pattern = search.like_pattern();
        let films = self.fetch_all(&search_sql(search), Some(&pattern)).await?;
        info!("Search films: {} matches", films.len());
        Ok(films)
    }

    async fn create(&self, fields: &FilmFields, actors_id: &[i32]) -> Result<i32, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO film (name, description, release_date, rating) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.release_date)
        .bind(fields.rating)
        .fetch_one(&mut *tx)
        .await?;
        FILM_ACTORS.insert(&mut tx, id, actors_id).await?;

        tx.commit().await?;
        info!("Created film with id {}", id);
        Ok(id)
    }

    async fn put(&self, id: i32, fields: &FilmFields, actors_id: Option<&[i32]>) -> Result<Film, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>(
            "UPDATE film SET name = $1, description = $2, release_date = $3, rating = $4 WHERE id = $5 RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(fields.release_date)
        .bind(fields.rating)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DatabaseError::NotFound)?;
        FILM_ACTORS.replace(&mut tx, id, actors_id).await?;
        let film = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Put film with id {}", id);
        Ok(film)
    }

    async fn patch(&self, id: i32, request: &FilmRequest) -> Result<Film, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        match request.updates().build(id) {
            Some(stmt) => {
                stmt.execute(&mut tx).await?.ok_or(DatabaseError::NotFound)?;
            }
            None => lock_existing(&mut tx, "film", id).await?,
        }
        FILM_ACTORS.replace(&mut tx, id, request.actors_id.as_deref()).await?;
        let film = fetch_one(&mut tx, id).await?;

        tx.commit().await?;
        info!("Patch film with id {}", id);
        Ok(film)
    }

    async fn delete(&self, id: i32) -> Result<(), DatabaseError> {
        delete_by_id(&self.pool, "film", id).await?;
        info!("Deleted film with id {}", id);
        Ok(())
    }
}
