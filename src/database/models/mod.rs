pub mod actor;
pub mod film;
pub mod user;

pub use actor::{Actor, ActorFields, ActorFilmRow, ActorRequest};
pub use film::{Film, FilmActorRow, FilmFields, FilmRequest};
pub use user::{Credentials, User, UserChanges, UserRecord, UserRequest, UserRow};

/// Field-level complaint, written verbatim as a 400 body.
pub type Validation = Result<(), String>;

pub(crate) fn require<T: Clone>(value: &Option<T>, field: &str) -> Result<T, String> {
    value.clone().ok_or_else(|| format!("{} is required", field))
}
