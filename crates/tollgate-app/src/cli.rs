//! CLI argument definitions for the Tollgate server.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Tollgate — per-client token bucket rate limiting server.
#[derive(Parser, Debug)]
#[command(name = "tollgate", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Tokens per client bucket.
    #[arg(long = "capacity")]
    pub capacity: Option<u32>,

    /// Milliseconds between refill sweeps.
    #[arg(long = "refill-interval-ms")]
    pub refill_interval_ms: Option<u64>,

    /// Tokens credited per sweep.
    #[arg(long = "refill-amount")]
    pub refill_amount: Option<u32>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TOLLGATE_CONFIG env var > ~/.tollgate/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TOLLGATE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the API server port.
    ///
    /// Priority: --port flag > TOLLGATE_PORT env var > config file value.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        if let Some(p) = self.port {
            return p;
        }
        if let Ok(val) = std::env::var("TOLLGATE_PORT") {
            if let Ok(p) = val.parse::<u16>() {
                return p;
            }
        }
        config_port
    }

    /// Fold every override into `config`.
    pub fn apply(&self, config: &mut tollgate_core::TollgateConfig) {
        config.server.port = self.resolve_port(config.server.port);
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(capacity) = self.capacity {
            config.limiter.capacity = capacity;
        }
        if let Some(ms) = self.refill_interval_ms {
            config.limiter.refill_interval_ms = ms;
        }
        if let Some(amount) = self.refill_amount {
            config.limiter.refill_amount = amount;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".tollgate").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".tollgate").join("config.toml");
    }
    PathBuf::from("config.toml")
}
