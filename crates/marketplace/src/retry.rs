//! Bounded exponential-backoff retry for upstream calls.
//!
//! Only errors the taxonomy marks retryable
//! ([`MarketplaceError::is_retryable`]) are attempted again; an auth
//! rejection or a permanent 4xx surfaces immediately. Exhausting the
//! attempt budget returns the last error.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::MarketplaceError;

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempt budget per call (first try included).
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling on the delay between attempts.
    pub max_delay: Duration,
    /// Growth factor applied to the delay after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

/// Grow the backoff delay for the next attempt, clamped to
/// [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// Small random delay added before each retry so concurrent campaign
/// tasks do not hammer the API in lockstep.
fn jitter() -> Duration {
    Duration::from_millis(rand::rng().random_range(0..250))
}

/// Run `operation` with bounded retries.
///
/// The operation always runs at least once, even with a zero attempt
/// budget. `op_name` is only used for logging.
pub async fn with_retry<T, F, Fut>(
    op_name: &str,
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, MarketplaceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, MarketplaceError>>,
{
    let mut delay = config.initial_delay;
    let mut attempt = 1u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                tracing::warn!(
                    op = op_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Upstream call failed, retrying",
                );
                tokio::time::sleep(delay + jitter()).await;
                delay = next_delay(delay, config);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
