//! Application state shared across all route handlers.

use std::time::Instant;

use tollgate_core::RateLimiter;

/// Shared application state.
///
/// Cloned into every handler task; the limiter's registry is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Per-client admission control.
    pub limiter: RateLimiter,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(limiter: RateLimiter) -> Self {
        Self {
            limiter,
            start_time: Instant::now(),
        }
    }
}
