//! Admission decision for a single request.

use std::sync::Arc;

use tracing::debug;

use crate::config::LimiterConfig;
use crate::error::Result;
use crate::identity::ClientIdentity;
use crate::registry::Registry;

/// Per-client rate limiter.
///
/// Cheap to clone; every clone shares the same registry.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    registry: Arc<Registry>,
}

impl RateLimiter {
    /// Wrap an existing registry, typically one also handed to a `Refiller`.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Build a limiter with a fresh registry sized from `config`.
    pub fn from_config(config: &LimiterConfig) -> Result<Self> {
        let registry = Registry::new(config.bucket_capacity()?);
        Ok(Self::new(Arc::new(registry)))
    }

    /// Spend one token from `identity`'s bucket.
    ///
    /// `true` means the request may proceed; `false` means the client has
    /// run dry and should be turned away until the next refill.
    pub fn admit(&self, identity: &ClientIdentity) -> bool {
        let admitted = self.registry.get_or_create(identity).consume();
        if !admitted {
            debug!(client = %identity, "Client rate limited");
        }
        admitted
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(capacity: u32) -> RateLimiter {
        RateLimiter::from_config(&LimiterConfig {
            capacity,
            ..LimiterConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_admit_until_exhausted() {
        let limiter = limiter(3);
        let id = ClientIdentity::from("X");
        assert!(limiter.admit(&id));
        assert!(limiter.admit(&id));
        assert!(limiter.admit(&id));
        assert!(!limiter.admit(&id));
    }

    #[test]
    fn test_exhausting_one_client_leaves_others_alone() {
        let limiter = limiter(2);
        let a = ClientIdentity::from("A");
        let b = ClientIdentity::from("B");

        while limiter.admit(&a) {}
        assert!(limiter.admit(&b));
        assert!(limiter.admit(&b));
        assert!(!limiter.admit(&b));
    }

    #[test]
    fn test_clones_share_registry() {
        let limiter = limiter(1);
        let other = limiter.clone();
        let id = ClientIdentity::from("shared");

        assert!(limiter.admit(&id));
        assert!(!other.admit(&id));
        assert_eq!(other.registry().len(), 1);
    }

    #[test]
    fn test_from_config_rejects_zero_capacity() {
        let config = LimiterConfig {
            capacity: 0,
            ..LimiterConfig::default()
        };
        assert!(RateLimiter::from_config(&config).is_err());
    }
}
