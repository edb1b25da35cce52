// handlers/public/mod.rs - token acquisition, no authentication required

pub mod auth;

pub use auth::*;
