pub mod health;
pub mod phrase;
pub mod translate;

pub use health::{health_check, metrics_endpoint};
pub use phrase::random_phrase;
pub use translate::translate;
