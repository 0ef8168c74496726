// ledger-gateway/src/retry.rs

use crate::{GatewayError, GatewayResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Exponential backoff configuration for transient gateway failures
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct BackoffConfig {
    /// Delay before the first retry, in milliseconds
    pub base_delay_ms: u64,
    /// Cap applied to every computed delay, in milliseconds
    pub max_delay_ms: u64,
    /// Multiplicative factor applied per attempt
    pub multiplier: u32,
    /// Total attempts, including the first
    pub max_attempts: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 250,
            max_delay_ms: 8_000,
            multiplier: 2,
            max_attempts: 4,
        }
    }
}

impl BackoffConfig {
    /// Delay before retry number `attempt` (1-based), capped
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt.saturating_sub(1));
        let delay = self.base_delay_ms.saturating_mul(factor as u64);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// Run a gateway read query, retrying transient failures with exponential
/// backoff and jitter. Terminal failures and exhausted attempts return the
/// last error. Never use this around submission: a retried submit could
/// double-spend.
pub async fn retry_with_backoff<T, F, Fut>(
    config: &BackoffConfig,
    operation: &str,
    mut call: F,
) -> GatewayResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = GatewayResult<T>>,
{
    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < config.max_attempts => {
                let delay = config.delay_for_attempt(attempt);
                let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..=50));
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient gateway failure, backing off"
                );
                tokio::time::sleep(delay + jitter).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
