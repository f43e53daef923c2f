//! Retry policy for counter-delta application
//!
//! Delta writes are best-effort: they are retried a bounded number of times
//! with jittered exponential backoff, then abandoned and handed to the
//! drift journal. Retrying forever would block the caller on an aggregate
//! that reconciliation can fix later.

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Bounded exponential backoff policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
    /// Multiplier applied per retry
    pub backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Build a policy from the configuration section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
        }
    }

    /// Base delay before retry number `attempt` (0-based), capped
    pub fn base_delay(&self, attempt: usize) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let millis = (self.initial_delay.as_millis() as f64 * factor) as u64;
        Duration::from_millis(millis).min(self.max_delay)
    }

    /// Base delay plus up to 25% random jitter, still capped
    ///
    /// Jitter spreads out retries from concurrent handlers that failed at
    /// the same moment against the same backend.
    pub fn jittered_delay(&self, attempt: usize) -> Duration {
        let base = self.base_delay(attempt);
        let jitter_ceiling = (base.as_millis() as u64) / 4;
        let jitter = if jitter_ceiling == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_ceiling)
        };
        (base + Duration::from_millis(jitter)).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}
