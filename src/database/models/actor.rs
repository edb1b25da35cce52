use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{require, Validation};
use crate::database::aggregate::JoinedRow;
use crate::database::patch::UpdateBuilder;

/// Actor with the ids of every film it appears in. `films_id` is always a
/// list, empty when there are no links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: i32,
    pub name: String,
    pub sex: String,
    pub birthday: NaiveDate,
    pub films_id: Vec<i32>,
}

/// One row of `actor LEFT JOIN actor_film`.
#[derive(Debug, Clone, FromRow)]
pub struct ActorFilmRow {
    pub id: i32,
    pub name: String,
    pub sex: String,
    pub birthday: NaiveDate,
    pub film_id: Option<i32>,
}

impl JoinedRow for ActorFilmRow {
    type Aggregate = Actor;

    fn parent_id(&self) -> i32 {
        self.id
    }

    fn child_id(&self) -> Option<i32> {
        self.film_id
    }

    fn into_aggregate(self) -> Actor {
        Actor {
            id: self.id,
            name: self.name,
            sex: self.sex,
            birthday: self.birthday,
            films_id: Vec::new(),
        }
    }

    fn attach(actor: &mut Actor, films: Vec<i32>) {
        actor.films_id = films;
    }
}

/// Sparse actor payload shared by create, put and patch. `films_id: None`
/// leaves links untouched; `Some(vec![])` clears them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRequest {
    pub name: Option<String>,
    pub sex: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub films_id: Option<Vec<i32>>,
}

/// Fully specified scalar fields, as required by create and put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorFields {
    pub name: String,
    pub sex: String,
    pub birthday: NaiveDate,
}

/// Column widths of `actor.name` and `actor.sex`
pub const NAME_MAX_CHARS: usize = 255;
pub const SEX_MAX_CHARS: usize = 32;

fn check_text(value: Option<&str>, field: &str, max: usize) -> Validation {
    let Some(value) = value else { return Ok(()) };
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    if value.chars().count() > max {
        return Err(format!("{} length must be at most {}", field, max));
    }
    Ok(())
}

impl ActorRequest {
    pub fn validate(&self) -> Validation {
        check_text(self.name.as_deref(), "name", NAME_MAX_CHARS)?;
        check_text(self.sex.as_deref(), "sex", SEX_MAX_CHARS)
    }

    pub fn complete(&self) -> Result<ActorFields, String> {
        self.validate()?;
        Ok(ActorFields {
            name: require(&self.name, "name")?,
            sex: require(&self.sex, "sex")?,
            birthday: require(&self.birthday, "birthday")?,
        })
    }

    /// Assignments for the fields present, in column order.
    pub fn updates(&self) -> UpdateBuilder {
        UpdateBuilder::new("actor")
            .set("name", self.name.clone())
            .set("sex", self.sex.clone())
            .set("birthday", self.birthday)
    }
}
