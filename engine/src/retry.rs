// Bounded retry for calls to the external market data provider.
use std::future::Future;
use std::time::Duration;

use crate::error::EngineError;

/// Fixed-delay retry policy shared by every provider call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// `attempts` is clamped to at least one.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it produces a value or the attempts are used up.
    ///
    /// An error and an absent result (`Ok(None)`) both count as a failed
    /// attempt. The delay is only awaited between attempts, never after the
    /// last one. Exhaustion yields `None`; provider errors never escape.
    pub async fn run<T, F, Fut>(&self, operation: &str, asset: &str, mut op: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, EngineError>>,
    {
        for attempt in 1..=self.attempts {
            match op().await {
                Ok(Some(value)) => {
                    if attempt > 1 {
                        tracing::debug!(asset, operation, attempt, "Provider call succeeded after retry");
                    }
                    return Some(value);
                }
                Ok(None) => {
                    tracing::debug!(asset, operation, attempt, "Provider returned no data");
                }
                Err(e) => {
                    tracing::warn!(
                        asset,
                        operation,
                        attempt,
                        max_attempts = self.attempts,
                        error = %e,
                        "Provider call failed"
                    );
                }
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }
        tracing::warn!(asset, operation, attempts = self.attempts, "Giving up after exhausting retries");
        None
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_millis(500))
    }
}
