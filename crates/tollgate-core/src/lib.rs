//! Tollgate core - per-client token bucket admission control.
//!
//! A [`Registry`] maps each [`ClientIdentity`] to its own [`Bucket`]. The
//! [`RateLimiter`] spends a token per request and the [`Refiller`] tops every
//! bucket back up on a fixed interval.

pub mod bucket;
pub mod config;
pub mod error;
pub mod identity;
pub mod limiter;
pub mod refill;
pub mod registry;

pub use bucket::Bucket;
pub use config::TollgateConfig;
pub use error::{Result, TollgateError};
pub use identity::ClientIdentity;
pub use limiter::RateLimiter;
pub use refill::Refiller;
pub use registry::Registry;
