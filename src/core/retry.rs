//! Fixed-interval retry policy.

use crate::{Error, Result};
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounded polling: wait `interval`, probe, repeat up to `max_attempts` times.
///
/// No backoff and no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl RetryPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Attempt numbers, starting at 1.
    pub fn attempts(&self) -> RangeInclusive<u32> {
        1..=self.max_attempts
    }

    /// Total time spent sleeping when every attempt fails.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }

    /// Sleep one interval, returning early with `Error::Cancelled`.
    pub async fn pause(&self, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(self.interval) => Ok(()),
        }
    }

    /// Timeout error for an exhausted policy.
    pub fn exhausted(&self) -> Error {
        Error::StartTimeout {
            attempts: self.max_attempts,
            budget: self.budget(),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 15)
    }
}
