//! Randomized backoff policy for bounded delivery retries.
//!
//! The backoff interval is a fixed floor plus a uniform random component:
//! `base_delay + jitter_span × U[0,1)`. The interval does not grow with the
//! attempt number; the budget is bounded by attempt count, not wall-clock
//! time.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_BASE_DELAY_MS, DEFAULT_JITTER_SPAN_MS, DEFAULT_MAX_RETRIES};

/// Retry budget and backoff timing for stream delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Retries allowed after the initial attempt.
    pub max_retries: u32,

    /// Fixed floor of every backoff interval.
    pub base_delay: Duration,

    /// Upper bound of the uniform random component added to the floor.
    pub jitter_span: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            jitter_span: Duration::from_millis(DEFAULT_JITTER_SPAN_MS),
        }
    }
}

impl BackoffPolicy {
    /// Draws the next backoff interval.
    ///
    /// Returns `base_delay + jitter_span × U` with `U` uniform in `[0, 1)`,
    /// so the result always lands in `[base_delay, base_delay + jitter_span)`.
    pub fn delay(&self) -> Duration {
        if self.jitter_span.is_zero() {
            return self.base_delay;
        }

        let jitter = self.jitter_span.as_secs_f64() * rand::rng().random::<f64>();
        self.base_delay + Duration::from_secs_f64(jitter)
    }

    /// Total publish attempts this policy allows (initial + retries).
    pub fn total_attempts(&self) -> u64 {
        u64::from(self.max_retries) + 1
    }
}
