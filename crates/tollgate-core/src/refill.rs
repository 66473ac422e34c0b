//! Background refill task.
//!
//! Every interval the refiller walks the registry and credits each bucket.
//! `tick()` runs one sweep synchronously so tests do not need a real clock.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, trace};

use crate::config::LimiterConfig;
use crate::error::{Result, TollgateError};
use crate::registry::Registry;

/// Periodic token refill over a shared registry.
pub struct Refiller {
    registry: Arc<Registry>,
    interval: Duration,
    amount: u32,
    shutdown: Arc<Notify>,
}

impl Refiller {
    /// Create a refiller crediting `amount` tokens every `interval`.
    ///
    /// Both must be non-zero; a zero period would stall the timer.
    pub fn new(registry: Arc<Registry>, interval: Duration, amount: u32) -> Result<Self> {
        if interval.is_zero() {
            return Err(TollgateError::InvalidRefill(
                "refill interval must be greater than zero".to_string(),
            ));
        }
        if amount == 0 {
            return Err(TollgateError::InvalidRefill(
                "refill amount must be greater than zero".to_string(),
            ));
        }
        Ok(Self {
            registry,
            interval,
            amount,
            shutdown: Arc::new(Notify::new()),
        })
    }

    /// Create a refiller from limiter settings.
    pub fn from_config(registry: Arc<Registry>, config: &LimiterConfig) -> Result<Self> {
        Self::new(registry, config.refill_interval(), config.refill_amount)
    }

    /// Credit every bucket once. Returns how many buckets were visited.
    pub fn tick(&self) -> usize {
        let mut visited = 0;
        self.registry.for_each_bucket(|bucket| {
            bucket.refill_by(self.amount);
            visited += 1;
        });
        trace!(buckets = visited, "Refill sweep complete");
        visited
    }

    /// Run sweeps every interval until `shutdown` is called.
    ///
    /// The first sweep happens one full interval after start. A sweep that
    /// has begun always finishes before shutdown is observed.
    pub async fn run(&self) {
        let start = tokio::time::Instant::now() + self.interval;
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval = ?self.interval,
            amount = self.amount,
            "Refill task started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick();
                }
                _ = self.shutdown.notified() => {
                    info!("Refill task stopped");
                    return;
                }
            }
        }
    }

    /// Move the refiller onto the runtime.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Signal the run loop to stop after any in-flight sweep.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }
}
