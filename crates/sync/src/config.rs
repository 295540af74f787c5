//! Sync worker configuration loaded from environment variables.

use std::time::Duration;

use advsync_marketplace::RetryConfig;

/// Tunables for the sync scheduler and orchestrator.
///
/// All fields have defaults suitable for local development. In
/// production, override via environment variables.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Delay between full sync cycles (default: `900` seconds).
    pub sync_interval: Duration,
    /// Minimum spacing between statistics calls per shop
    /// (default: `60` seconds — the upstream ceiling).
    pub stats_interval: Duration,
    /// Per-call HTTP timeout (default: `30` seconds).
    pub request_timeout: Duration,
    /// Retry budget for transient upstream errors.
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default |
    /// |------------------------|---------|
    /// | `SYNC_INTERVAL_SECS`   | `900`   |
    /// | `STATS_INTERVAL_SECS`  | `60`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`    |
    /// | `MAX_RETRY_ATTEMPTS`   | `3`     |
    pub fn from_env() -> Self {
        Self {
            sync_interval: Duration::from_secs(env_u64("SYNC_INTERVAL_SECS", 900)),
            stats_interval: Duration::from_secs(env_u64("STATS_INTERVAL_SECS", 60)),
            request_timeout: Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", 30)),
            retry: RetryConfig {
                // Every call gets at least one attempt.
                max_attempts: env_u64("MAX_RETRY_ATTEMPTS", 3).clamp(1, 10) as u32,
                ..RetryConfig::default()
            },
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate touching process env; keep it that
    // way, env vars are process-global.
    #[test]
    fn zero_retry_attempts_is_clamped_to_one() {
        std::env::set_var("MAX_RETRY_ATTEMPTS", "0");
        let config = SyncConfig::from_env();
        std::env::remove_var("MAX_RETRY_ATTEMPTS");

        assert_eq!(config.retry.max_attempts, 1);
    }
}
