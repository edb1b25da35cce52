pub mod aggregate;
pub mod manager;
pub mod models;
pub mod patch;
pub mod relations;
pub mod repository;

pub use manager::DatabaseError;
pub use repository::{
    ActorRepository, FilmRepository, PgActorRepository, PgFilmRepository, PgUserRepository, UserRepository,
};
