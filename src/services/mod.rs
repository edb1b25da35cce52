//! Service layer. Actor and film services are thin pass-throughs over their
//! repositories; the user service adds password hashing and token issuance.

pub mod actor;
pub mod film;
pub mod user;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::filter::FilterError;

pub use actor::ActorService;
pub use film::FilmService;
pub use user::UserService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Role {0} does not exist. Available roles: USER, ADMIN")]
    UnknownRole(String),

    #[error("Can not process password")]
    PasswordHash,
}
