use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TollgateError};

/// Top-level configuration for Tollgate.
///
/// Loaded from `~/.tollgate/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TollgateConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limiter: LimiterConfig,
}

impl TollgateConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TollgateConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Reject settings the limiter cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.limiter.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Token bucket settings shared by every client bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimiterConfig {
    /// Maximum tokens a bucket holds. New buckets start full.
    pub capacity: u32,
    /// Milliseconds between refill sweeps.
    pub refill_interval_ms: u64,
    /// Tokens credited to each bucket per sweep.
    pub refill_amount: u32,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            refill_interval_ms: 1000,
            refill_amount: 1,
        }
    }
}

impl LimiterConfig {
    pub fn validate(&self) -> Result<()> {
        self.bucket_capacity()?;
        if self.refill_interval_ms == 0 {
            return Err(TollgateError::InvalidRefill(
                "refill_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.refill_amount == 0 {
            return Err(TollgateError::InvalidRefill(
                "refill_amount must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Capacity as the non-zero type buckets are built from.
    pub fn bucket_capacity(&self) -> Result<NonZeroU32> {
        NonZeroU32::new(self.capacity).ok_or(TollgateError::InvalidCapacity)
    }

    pub fn refill_interval(&self) -> Duration {
        Duration::from_millis(self.refill_interval_ms)
    }
}
