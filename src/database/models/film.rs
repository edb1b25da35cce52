use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require, Validation};
use crate::database::aggregate::JoinedRow;
use crate::database::patch::UpdateBuilder;

pub const NAME_MAX_CHARS: usize = 150;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;
pub const RATING_MAX: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i32,
    pub actors_id: Vec<i32>,
}

/// One row of `film LEFT JOIN actor_film`.
#[derive(Debug, Clone, FromRow)]
pub struct FilmActorRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i32,
    pub actor_id: Option<i32>,
}

impl JoinedRow for FilmActorRow {
    type Aggregate = Film;

    fn parent_id(&self) -> i32 {
        self.id
    }

    fn child_id(&self) -> Option<i32> {
        self.actor_id
    }

    fn into_aggregate(self) -> Film {
        Film {
            id: self.id,
            name: self.name,
            description: self.description,
            release_date: self.release_date,
            rating: self.rating,
            actors_id: Vec::new(),
        }
    }

    fn attach(film: &mut Film, actors: Vec<i32>) {
        film.actors_id = actors;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub rating: Option<i32>,
    pub actors_id: Option<Vec<i32>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmFields {
    pub name: String,
    pub description: String,
    pub release_date: NaiveDate,
    pub rating: i32,
}

impl FilmRequest {
    /// Bounds on whichever fields are present.
    pub fn validate(&self) -> Validation {
        if let Some(name) = &self.name {
            let len = name.chars().count();
            if len < 1 || len > NAME_MAX_CHARS {
                return Err(format!("name length must be in [1; {}]", NAME_MAX_CHARS));
            }
        }
        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_CHARS {
                return Err(format!("description length must be in [0; {}]", DESCRIPTION_MAX_CHARS));
            }
        }
        if let Some(rating) = self.rating {
            if !(0..=RATING_MAX).contains(&rating) {
                return Err(format!("rating must be in [0; {}]", RATING_MAX));
            }
        }
        Ok(())
    }

    /// Description may be omitted on create/put and defaults to empty.
    pub fn complete(&self) -> Result<FilmFields, String> {
        self.validate()?;
        Ok(FilmFields {
            name: require(&self.name, "name")?,
            description: self.description.clone().unwrap_or_default(),
            release_date: require(&self.release_date, "releaseDate")?,
            rating: require(&self.rating, "rating")?,
        })
    }

    pub fn updates(&self) -> UpdateBuilder {
        UpdateBuilder::new("film")
            .set("name", self.name.clone())
            .set("description", self.description.clone())
            .set("release_date", self.release_date)
            .set("rating", self.rating)
    }
}
