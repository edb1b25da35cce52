// handlers/public/auth/mod.rs - account registration and login

pub mod authenticate; // POST /api/auth/authenticate
pub mod register; // POST /api/auth/register

pub use authenticate::authenticate_post;
pub use register::register_post;
