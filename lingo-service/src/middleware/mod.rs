pub mod auth;

pub use auth::{credential_middleware, RequestCredential};
