use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::auth::TokenCodec;
use crate::config::AppConfig;
use crate::database::{
    ActorRepository, FilmRepository, PgActorRepository, PgFilmRepository, PgUserRepository, UserRepository,
};
use crate::services::{ActorService, FilmService, UserService};

/// Shared by every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub actors: ActorService,
    pub films: FilmService,
    pub users: UserService,
    pub tokens: Arc<TokenCodec>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: PgPool) -> Self {
        Self::with_repositories(
            config,
            Arc::new(PgActorRepository::new(pool.clone())),
            Arc::new(PgFilmRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }

    pub fn with_repositories(
        config: &AppConfig,
        actors: Arc<dyn ActorRepository>,
        films: Arc<dyn FilmRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        let tokens = Arc::new(TokenCodec::from_config(&config.security));
        Self {
            actors: ActorService::new(actors),
            films: FilmService::new(films),
            users: UserService::new(users, tokens.clone(), config.security.registration_role),
            tokens,
            request_timeout: Duration::from_secs(config.api.request_timeout_secs),
        }
    }
}
