//! Periodic scheduler spawning one sync task per shop.
//!
//! A single long-lived Tokio task that, on every tick, loads the
//! syncable shops and runs their cycles fully in parallel. Runs until
//! the cancellation token is triggered.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use advsync_db::repositories::ShopRepo;
use advsync_db::DbPool;
use advsync_marketplace::AdvertApi;

use crate::orchestrator::Orchestrator;

/// Periodic driver for shop sync cycles.
pub struct SyncScheduler<A> {
    pool: DbPool,
    orchestrator: Arc<Orchestrator<A>>,
    interval: Duration,
}

impl<A: AdvertApi + 'static> SyncScheduler<A> {
    pub fn new(pool: DbPool, orchestrator: Arc<Orchestrator<A>>, interval: Duration) -> Self {
        Self {
            pool,
            orchestrator,
            interval,
        }
    }

    /// Run the scheduling loop until `cancel` is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "Sync scheduler started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Sync scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    /// One scheduling pass: fan out a task per shop and wait for all.
    async fn run_cycle(&self) {
        let shops = match ShopRepo::list_syncable(&self.pool).await {
            Ok(shops) => shops,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load shops, skipping cycle");
                return;
            }
        };

        if shops.is_empty() {
            tracing::debug!("No syncable shops");
            return;
        }

        let mut tasks = tokio::task::JoinSet::new();
        for shop in shops {
            let orchestrator = Arc::clone(&self.orchestrator);
            tasks.spawn(async move {
                if let Err(e) = orchestrator.sync_shop(&shop).await {
                    tracing::error!(shop_id = shop.id, error = %e, "Shop cycle failed");
                }
            });
        }
        while tasks.join_next().await.is_some() {}
    }
}
