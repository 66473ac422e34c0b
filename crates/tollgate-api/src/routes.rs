//! Router setup with all API routes and middleware.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use tollgate_core::config::ServerConfig;
use tollgate_core::{Result, TollgateError};

use crate::handlers;
use crate::rate_limit::rate_limit_middleware;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
///
/// `/limited` sits behind the per-client limiter; `/unlimited` and `/health`
/// are exempt.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/unlimited", get(handlers::unlimited));

    let rate_limited_routes = Router::new()
        .route("/limited", get(handlers::limited))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    public_routes
        .merge(rate_limited_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address and serve until `shutdown` resolves.
///
/// Connection info is attached so the limiter can key on peer address.
pub async fn start_server<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| TollgateError::Api(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "API server listening");

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .map_err(|e| TollgateError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
