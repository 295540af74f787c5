//! Per-shop sync cycle driver.
//!
//! For each campaign the orchestrator strictly serializes
//! configuration-fetch → change detection → statistics-fetch →
//! history accumulation, because the statistics enrichment depends on
//! the item set fetched in the same pass. Distinct campaigns run
//! concurrently under the shared statistics rate limiter; failures
//! are isolated per campaign, except authentication failures which
//! degrade the whole shop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use advsync_core::campaign::{CampaignSnapshot, CampaignState};
use advsync_core::detector::{detect_changes, seed_state};
use advsync_core::history::{build_history_rows, ItemMetrics};
use advsync_core::types::{CampaignId, ItemId, ShopId, Timestamp};
use advsync_db::models::change_event::NewChangeEvent;
use advsync_db::models::shop::{Shop, ShopStatus};
use advsync_db::repositories::{
    CampaignItemViewRepo, CampaignStateRepo, ChangeEventRepo, HistoryRepo, ShopRepo,
};
use advsync_db::DbPool;
use advsync_events::{ChangeNotice, EventBus};
use advsync_marketplace::{
    with_retry, AdvertApi, MarketplaceError, RateLimiter, RetryConfig, ShopAuth,
};

use crate::locks::CampaignLocks;
use crate::vendor_cache::VendorCodeCache;

/// Errors that fail a campaign's (or shop's) sync cycle.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Upstream API call failed after exhausting retries.
    #[error("Marketplace API: {0}")]
    Api(#[from] MarketplaceError),

    /// State store or ledger unreachable. Never conflated with
    /// "no change detected".
    #[error("Database: {0}")]
    Db(#[from] sqlx::Error),

    /// A stored campaign state carries a campaign type code this
    /// build does not know.
    #[error("Stored state for shop {shop_id} campaign {campaign_id} has an unknown campaign type")]
    CorruptState {
        shop_id: ShopId,
        campaign_id: CampaignId,
    },
}

/// Outcome of one campaign pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignOutcome {
    /// First sight: state seeded silently, history appended.
    Seeded { rows_appended: u64 },
    /// Tracked campaign diffed against stored state.
    Synced { events: usize, rows_appended: u64 },
    /// Campaign type is not tracked by the pipeline.
    SkippedUntracked,
}

/// Drives sync cycles for all shops against one advert API.
pub struct Orchestrator<A> {
    pool: DbPool,
    api: Arc<A>,
    bus: Arc<EventBus>,
    retry: RetryConfig,
    /// Minimum spacing between statistics calls within one shop.
    stats_interval: Duration,
    locks: CampaignLocks,
    vendor_caches: tokio::sync::Mutex<HashMap<ShopId, Arc<VendorCodeCache>>>,
    /// One limiter per shop, held across cycles: an overrunning cycle
    /// followed by an immediate tick must not compress the spacing.
    stats_limiters: tokio::sync::Mutex<HashMap<ShopId, Arc<RateLimiter>>>,
}

impl<A: AdvertApi> Orchestrator<A> {
    pub fn new(
        pool: DbPool,
        api: Arc<A>,
        bus: Arc<EventBus>,
        retry: RetryConfig,
        stats_interval: Duration,
    ) -> Self {
        Self {
            pool,
            api,
            bus,
            retry,
            stats_interval,
            locks: CampaignLocks::new(),
            vendor_caches: tokio::sync::Mutex::new(HashMap::new()),
            stats_limiters: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Run one full cycle for a shop.
    ///
    /// Sets the shop status to `syncing` for the duration, `active` on
    /// completion (even when individual campaigns failed), and
    /// `auth_error` when the API rejected the shop's credentials.
    pub async fn sync_shop(&self, shop: &Shop) -> Result<(), SyncError> {
        let auth = ShopAuth {
            shop_id: shop.id,
            token: shop.api_token.clone(),
        };

        ShopRepo::set_status(&self.pool, shop.id, ShopStatus::Syncing).await?;
        tracing::info!(shop_id = shop.id, shop = %shop.name, "Shop cycle started");

        let result = self.run_shop_cycle(shop.id, &auth).await;

        let final_status = match &result {
            Err(SyncError::Api(MarketplaceError::Auth(_))) => ShopStatus::AuthError,
            // Transient failures must not leave the shop stuck in
            // `syncing`; the next cycle will pick it up again.
            _ => ShopStatus::Active,
        };
        ShopRepo::set_status(&self.pool, shop.id, final_status).await?;

        result
    }

    async fn run_shop_cycle(&self, shop_id: ShopId, auth: &ShopAuth) -> Result<(), SyncError> {
        let cache = self.vendor_cache(shop_id).await;
        cache.refresh(&self.pool, shop_id).await;
        let vendor_codes = cache.snapshot().await;

        let campaigns =
            with_retry("list_campaigns", &self.retry, || self.api.list_campaigns(auth)).await?;

        // The shop's persistent limiter, shared across the campaign
        // tasks; one capture timestamp so intraday series line up.
        let limiter = self.stats_limiter(shop_id).await;
        let fetched_at = Utc::now();

        let tasks = campaigns.iter().map(|campaign| {
            self.sync_campaign(
                auth,
                campaign.campaign_id,
                fetched_at,
                &vendor_codes,
                Arc::clone(&limiter),
            )
        });
        let results = join_all(tasks).await;

        let mut auth_failure: Option<SyncError> = None;
        for (campaign, result) in campaigns.iter().zip(results) {
            match result {
                Ok(outcome) => {
                    tracing::debug!(
                        shop_id,
                        campaign_id = campaign.campaign_id,
                        ?outcome,
                        "Campaign synced",
                    );
                }
                Err(e) => {
                    // A failed campaign never aborts its siblings; an
                    // auth rejection degrades the shop after the rest
                    // have finished.
                    if matches!(e, SyncError::Api(MarketplaceError::Auth(_)))
                        && auth_failure.is_none()
                    {
                        auth_failure = Some(e);
                    } else {
                        tracing::error!(
                            shop_id,
                            campaign_id = campaign.campaign_id,
                            error = %e,
                            "Campaign sync failed",
                        );
                    }
                }
            }
        }

        match auth_failure {
            Some(e) => Err(e),
            None => {
                tracing::info!(shop_id, campaigns = campaigns.len(), "Shop cycle finished");
                Ok(())
            }
        }
    }

    /// Sync one campaign: config → detect → stats → history.
    async fn sync_campaign(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
        fetched_at: Timestamp,
        vendor_codes: &HashMap<ItemId, String>,
        limiter: Arc<RateLimiter>,
    ) -> Result<CampaignOutcome, SyncError> {
        // Serializes change detection per (shop, campaign) key.
        let _guard = self.locks.acquire(auth.shop_id, campaign_id).await;

        let config = with_retry("fetch_config", &self.retry, || {
            self.api.fetch_config(auth, campaign_id)
        })
        .await?;
        let Some(snapshot) = config.into_snapshot() else {
            return Ok(CampaignOutcome::SkippedUntracked);
        };

        limiter.acquire().await;
        let stats = with_retry("fetch_stats", &self.retry, || {
            self.api.fetch_stats(auth, campaign_id)
        })
        .await?;
        let metrics: Vec<ItemMetrics> = stats.items.into_iter().map(Into::into).collect();
        let current_views: HashMap<ItemId, i64> =
            metrics.iter().map(|m| (m.item_id, m.views)).collect();

        let prior = CampaignStateRepo::get(&self.pool, auth.shop_id, campaign_id).await?;
        let (state, events_emitted) = match prior {
            None => {
                let state = self.seed_campaign(auth, campaign_id, &snapshot, &current_views).await?;
                (state, None)
            }
            Some(row) => {
                let prior = row.into_state().ok_or(SyncError::CorruptState {
                    shop_id: auth.shop_id,
                    campaign_id,
                })?;
                let detection = self
                    .detect_and_persist(auth, campaign_id, &prior, &snapshot, &current_views)
                    .await?;
                detection
            }
        };

        let rows = build_history_rows(
            auth.shop_id,
            campaign_id,
            fetched_at,
            &metrics,
            &state.items,
            state.campaign_type,
            state.cpm,
            vendor_codes,
        );
        let rows_appended = HistoryRepo::insert_batch(&self.pool, &rows).await?;

        Ok(match events_emitted {
            None => CampaignOutcome::Seeded { rows_appended },
            Some(events) => CampaignOutcome::Synced {
                events,
                rows_appended,
            },
        })
    }

    /// First sight of a campaign: persist the fetched configuration
    /// as-is and set the view baselines. Deliberately emits no events.
    async fn seed_campaign(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
        snapshot: &CampaignSnapshot,
        current_views: &HashMap<ItemId, i64>,
    ) -> Result<CampaignState, SyncError> {
        let state = seed_state(auth.shop_id, campaign_id, snapshot);
        CampaignStateRepo::upsert(&self.pool, &state).await?;

        for &item_id in &state.items {
            if let Some(&views) = current_views.get(&item_id) {
                CampaignItemViewRepo::set_last_views(
                    &self.pool,
                    auth.shop_id,
                    campaign_id,
                    item_id,
                    views,
                )
                .await?;
            }
        }

        tracing::info!(
            shop_id = auth.shop_id,
            campaign_id,
            items = state.items.len(),
            "Campaign seeded",
        );
        Ok(state)
    }

    /// Diff a tracked campaign, persist the new state, and append +
    /// publish the resulting events.
    async fn detect_and_persist(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
        prior: &CampaignState,
        snapshot: &CampaignSnapshot,
        current_views: &HashMap<ItemId, i64>,
    ) -> Result<(CampaignState, Option<usize>), SyncError> {
        let last_views: HashMap<ItemId, i64> =
            CampaignItemViewRepo::list_for_campaign(&self.pool, auth.shop_id, campaign_id)
                .await?
                .into_iter()
                .map(|row| (row.item_id, row.last_views))
                .collect();

        let detection = detect_changes(prior, snapshot, current_views, &last_views);

        CampaignStateRepo::upsert(&self.pool, &detection.next_state).await?;

        for change in &detection.events {
            let event =
                NewChangeEvent::from_detected(auth.shop_id, campaign_id, change.clone());
            ChangeEventRepo::insert(&self.pool, &event).await?;
            // Published only after the durable write succeeded.
            self.bus
                .publish(ChangeNotice::from_detected(auth.shop_id, campaign_id, change));
        }

        for &(item_id, views) in &detection.view_updates {
            CampaignItemViewRepo::set_last_views(
                &self.pool,
                auth.shop_id,
                campaign_id,
                item_id,
                views,
            )
            .await?;
        }

        Ok((detection.next_state, Some(detection.events.len())))
    }

    async fn vendor_cache(&self, shop_id: ShopId) -> Arc<VendorCodeCache> {
        let mut caches = self.vendor_caches.lock().await;
        Arc::clone(
            caches
                .entry(shop_id)
                .or_insert_with(|| Arc::new(VendorCodeCache::new())),
        )
    }

    async fn stats_limiter(&self, shop_id: ShopId) -> Arc<RateLimiter> {
        let mut limiters = self.stats_limiters.lock().await;
        Arc::clone(
            limiters
                .entry(shop_id)
                .or_insert_with(|| Arc::new(RateLimiter::new(self.stats_interval))),
        )
    }
}
