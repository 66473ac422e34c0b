//! Route handler functions.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body served by the rate-limited endpoint.
pub const LIMITED_BODY: &str = "Limited, don't over use me!";
/// Body served by the exempt endpoint.
pub const UNLIMITED_BODY: &str = "Unlimited! Let's Go!";

/// GET /limited - only reached once the middleware has admitted the client.
pub async fn limited() -> &'static str {
    LIMITED_BODY
}

/// GET /unlimited - never touches a bucket.
pub async fn unlimited() -> &'static str {
    UNLIMITED_BODY
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Distinct clients with a bucket in the registry.
    pub tracked_clients: u64,
    /// Capacity of every bucket.
    pub capacity: u32,
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.limiter.registry();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        tracked_clients: registry.len() as u64,
        capacity: registry.capacity().get(),
    })
}
