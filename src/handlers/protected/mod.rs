// handlers/protected/mod.rs - handlers behind jwt_auth_middleware
//
// Every handler here can rely on an AuthUser extension with at least USER
// role. Handlers that mutate state call `AuthUser::require(Role::Admin)`
// before touching the path or body.

pub mod actor; // /api/actor, /api/actor/:id
pub mod film; // /api/film, /api/film/search, /api/film/:id
pub mod user; // /api/user, /api/user/:id
