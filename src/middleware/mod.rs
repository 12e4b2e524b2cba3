pub mod auth;
pub mod cors;

pub use auth::AuthMiddleware;
pub use cors::cors;
