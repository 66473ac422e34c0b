//! Per-client rate limiting middleware.
//!
//! Keys each request by the peer IP from axum's `ConnectInfo` and asks the
//! shared limiter for a token. Requests served without connection info (for
//! example through `oneshot` in tests) all share the `unknown` bucket.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tollgate_core::ClientIdentity;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity used when the peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Derive the limiter key for a request.
pub fn client_identity(req: &Request) -> ClientIdentity {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| ClientIdentity::from(*addr))
        .unwrap_or_else(|| ClientIdentity::from(UNKNOWN_CLIENT))
}

/// Axum middleware that enforces the per-client limit.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let identity = client_identity(&req);
    if state.limiter.admit(&identity) {
        next.run(req).await
    } else {
        ApiError::TooManyRequests.into_response()
    }
}
