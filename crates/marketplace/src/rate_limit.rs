//! Shared fixed-interval rate limiter for the statistics endpoint.
//!
//! The upstream ceiling is roughly one statistics call per minute per
//! shop, shared across all of that shop's concurrent campaign tasks.
//! One [`RateLimiter`] is held per shop for the process lifetime and
//! injected into the orchestrator, rather than ad hoc sleeps in
//! business logic; back-to-back cycles keep honoring the spacing.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Hands out permits spaced at least `min_interval` apart.
///
/// The first `acquire` resolves immediately; later callers queue on
/// the internal mutex and sleep out their slot, so acquisition order
/// follows lock acquisition order.
pub struct RateLimiter {
    min_interval: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Wait until a call slot is available.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        if *next_slot > now {
            tokio::time::sleep_until(*next_slot).await;
            *next_slot += self.min_interval;
        } else {
            *next_slot = now + self.min_interval;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn subsequent_acquires_are_spaced() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(60));

        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(120));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_periods_do_not_accumulate_burst() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        limiter.acquire().await;

        // A long idle gap must not allow two back-to-back calls.
        tokio::time::sleep(Duration::from_secs(600)).await;
        let start = Instant::now();
        limiter.acquire().await;
        assert_eq!(Instant::now() - start, Duration::ZERO);
        limiter.acquire().await;
        assert!(Instant::now() - start >= Duration::from_secs(60));
    }
}
