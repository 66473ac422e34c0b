//! Tollgate API crate - axum HTTP surface over the rate limiter.
//!
//! Serves a rate-limited endpoint, an exempt endpoint and a health check.
//! The middleware in [`rate_limit`] turns limiter rejections into 429s.

pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
