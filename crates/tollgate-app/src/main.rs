//! Tollgate server binary - composition root.
//!
//! 1. Parse CLI and load configuration from TOML
//! 2. Build the client registry, limiter and refill task
//! 3. Serve the axum API until Ctrl-C, then stop the refill task

mod cli;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tollgate_api::routes;
use tollgate_api::state::AppState;
use tollgate_core::{RateLimiter, Refiller, Registry, TollgateConfig};

use crate::cli::CliArgs;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = TollgateConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing. RUST_LOG takes precedence over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Tollgate v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid limiter configuration");
        return Err(e.into());
    }

    // Limiter and refill task share one registry.
    let registry = Arc::new(Registry::new(config.limiter.bucket_capacity()?));
    let limiter = RateLimiter::new(Arc::clone(&registry));
    let refiller = Arc::new(Refiller::from_config(
        Arc::clone(&registry),
        &config.limiter,
    )?);
    tracing::info!(
        capacity = config.limiter.capacity,
        refill_interval_ms = config.limiter.refill_interval_ms,
        refill_amount = config.limiter.refill_amount,
        "Rate limiter ready"
    );

    let refill_handle = Arc::clone(&refiller).spawn();

    // API server.
    let state = AppState::new(limiter);
    let served = routes::start_server(&config.server, state, shutdown_signal()).await;

    refiller.shutdown();
    if let Err(e) = refill_handle.await {
        tracing::warn!(error = %e, "Refill task ended abnormally");
    }

    served?;
    tracing::info!("Tollgate stopped");
    Ok(())
}
