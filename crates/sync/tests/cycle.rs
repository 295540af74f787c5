//! End-to-end shop cycle tests against a scripted advert API.
//!
//! Drives the full orchestrator path — config fetch, change
//! detection, statistics fetch, history append, shop status
//! transitions — with an in-memory [`AdvertApi`] implementation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use async_trait::async_trait;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use advsync_db::models::shop::Shop;
use advsync_db::repositories::{CampaignStateRepo, ChangeEventRepo, HistoryRepo, ShopRepo};
use advsync_events::EventBus;
use advsync_marketplace::{
    AdvertApi, CampaignConfig, CampaignRef, CampaignStats, ItemStats, MarketplaceError,
    RetryConfig, ShopAuth,
};
use advsync_sync::{Orchestrator, SyncError};

// ---------------------------------------------------------------------------
// Scripted API
// ---------------------------------------------------------------------------

#[derive(Default)]
struct ScriptedApi {
    configs: Mutex<HashMap<i64, CampaignConfig>>,
    stats: Mutex<HashMap<i64, CampaignStats>>,
    reject_auth: AtomicBool,
    broken_stats: Mutex<Vec<i64>>,
    stats_called_at: Mutex<Vec<Instant>>,
}

impl ScriptedApi {
    fn set_campaign(&self, config: CampaignConfig, stats: CampaignStats) {
        let id = config.campaign_id;
        self.configs.lock().unwrap().insert(id, config);
        self.stats.lock().unwrap().insert(id, stats);
    }
}

#[async_trait]
impl AdvertApi for ScriptedApi {
    async fn list_campaigns(&self, _auth: &ShopAuth) -> Result<Vec<CampaignRef>, MarketplaceError> {
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(MarketplaceError::Auth("token revoked".into()));
        }
        let configs = self.configs.lock().unwrap();
        Ok(configs
            .values()
            .map(|c| CampaignRef {
                campaign_id: c.campaign_id,
                campaign_type: c.campaign_type,
                status: c.status,
            })
            .collect())
    }

    async fn fetch_config(
        &self,
        _auth: &ShopAuth,
        campaign_id: i64,
    ) -> Result<CampaignConfig, MarketplaceError> {
        if self.reject_auth.load(Ordering::SeqCst) {
            return Err(MarketplaceError::Auth("token revoked".into()));
        }
        self.configs
            .lock()
            .unwrap()
            .get(&campaign_id)
            .cloned()
            .ok_or(MarketplaceError::Api {
                status: 404,
                body: "no such campaign".into(),
            })
    }

    async fn fetch_stats(
        &self,
        _auth: &ShopAuth,
        campaign_id: i64,
    ) -> Result<CampaignStats, MarketplaceError> {
        self.stats_called_at.lock().unwrap().push(Instant::now());
        if self.broken_stats.lock().unwrap().contains(&campaign_id) {
            return Err(MarketplaceError::Api {
                status: 400,
                body: "bad interval".into(),
            });
        }
        self.stats
            .lock()
            .unwrap()
            .get(&campaign_id)
            .cloned()
            .ok_or(MarketplaceError::Api {
                status: 404,
                body: "no stats".into(),
            })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn config(campaign_id: i64, cpm: Option<&str>, status: i16, items: &[i64]) -> CampaignConfig {
    CampaignConfig {
        campaign_id,
        cpm: cpm.map(String::from),
        status,
        campaign_type: 6, // search
        items: items.to_vec(),
    }
}

fn item(item_id: i64, views: i64, clicks: i64) -> ItemStats {
    ItemStats {
        item_id,
        views,
        clicks,
        ctr: dec!(1.0),
        spend: dec!(100),
        orders: 1,
        revenue: dec!(500),
    }
}

fn stats(campaign_id: i64, items: Vec<ItemStats>) -> CampaignStats {
    CampaignStats { campaign_id, items }
}

async fn seed_shop(pool: &PgPool) -> Shop {
    let id: i64 =
        sqlx::query_scalar("INSERT INTO shops (name, api_token) VALUES ($1, $2) RETURNING id")
            .bind("test-shop")
            .bind("token")
            .fetch_one(pool)
            .await
            .expect("insert shop");
    ShopRepo::get(pool, id).await.unwrap().unwrap()
}

fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 1,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(1),
        multiplier: 1.0,
    }
}

fn orchestrator(pool: PgPool, api: Arc<ScriptedApi>) -> Orchestrator<ScriptedApi> {
    // Zero statistics spacing: tests must not sleep out real minutes.
    Orchestrator::new(pool, api, Arc::new(EventBus::default()), fast_retry(), Duration::ZERO)
}

async fn shop_status(pool: &PgPool, shop_id: i64) -> i16 {
    ShopRepo::get(pool, shop_id).await.unwrap().unwrap().status
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn first_sight_seeds_state_without_events(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    // Item 30 gets statistics credit without being an official target.
    api.set_campaign(
        config(500, Some("500"), 9, &[1, 2]),
        stats(500, vec![item(1, 100, 5), item(2, 80, 0), item(30, 10, 1)]),
    );

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    orch.sync_shop(&shop).await.expect("cycle succeeds");

    // Seeded silently.
    let events = ChangeEventRepo::list_for_campaign(&pool, shop.id, 500, 10)
        .await
        .unwrap();
    assert!(events.is_empty());

    let state = CampaignStateRepo::get(&pool, shop.id, 500)
        .await
        .unwrap()
        .expect("state seeded")
        .into_state()
        .unwrap();
    assert_eq!(state.cpm, dec!(500));

    // History captured all stats items, halo-flagged where unofficial.
    let rows = HistoryRepo::query_range(
        &pool,
        shop.id,
        500,
        chrono::Utc::now() - chrono::Duration::hours(1),
        chrono::Utc::now() + chrono::Duration::hours(1),
    )
    .await
    .unwrap();
    assert_eq!(rows.len(), 3);
    let halo: Vec<i64> = rows.iter().filter(|r| r.is_associated).map(|r| r.item_id).collect();
    assert_eq!(halo, vec![30]);

    assert_eq!(shop_status(&pool, shop.id).await, 1); // active
}

#[sqlx::test(migrations = "../../migrations")]
async fn second_cycle_emits_diff_events(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.set_campaign(
        config(500, Some("500"), 9, &[1, 2]),
        stats(500, vec![item(1, 100, 5), item(2, 80, 0)]),
    );

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    orch.sync_shop(&shop).await.unwrap();

    // Cycle 2: bid 500 -> 550, item 2 out, item 3 in. Views grow so
    // no inactivity fires.
    api.set_campaign(
        config(500, Some("550"), 9, &[1, 3]),
        stats(500, vec![item(1, 150, 7), item(3, 20, 1)]),
    );
    orch.sync_shop(&shop).await.unwrap();

    let events = ChangeEventRepo::list_for_campaign(&pool, shop.id, 500, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 3);

    let bid = events.iter().find(|e| e.event_type == "bid_change").unwrap();
    assert_eq!(bid.old_value, "500");
    assert_eq!(bid.new_value, "550");
    let removed = events.iter().find(|e| e.event_type == "item_remove").unwrap();
    assert_eq!(removed.item_id, Some(2));
    let added = events.iter().find(|e| e.event_type == "item_add").unwrap();
    assert_eq!(added.item_id, Some(3));

    let state = CampaignStateRepo::get(&pool, shop.id, 500)
        .await
        .unwrap()
        .unwrap()
        .into_state()
        .unwrap();
    assert_eq!(state.cpm, dec!(550));
    assert_eq!(state.items, [1, 3].into_iter().collect());

    // Two captures, no merging.
    assert_eq!(HistoryRepo::count_for_campaign(&pool, shop.id, 500).await.unwrap(), 4);
}

#[sqlx::test(migrations = "../../migrations")]
async fn identical_cycles_stay_silent_but_keep_appending(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.set_campaign(
        config(500, Some("500"), 9, &[1]),
        stats(500, vec![item(1, 100, 5)]),
    );

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    orch.sync_shop(&shop).await.unwrap();
    orch.sync_shop(&shop).await.unwrap();

    // Stagnant views on the second pass are the one legitimate event.
    let events = ChangeEventRepo::list_for_campaign(&pool, shop.id, 500, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "item_inactive");

    // The ledger still grew: append-only, never replace-latest.
    assert_eq!(HistoryRepo::count_for_campaign(&pool, shop.id, 500).await.unwrap(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn growing_views_produce_no_inactivity_event(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.set_campaign(
        config(500, Some("500"), 9, &[1]),
        stats(500, vec![item(1, 100, 5)]),
    );

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    orch.sync_shop(&shop).await.unwrap();

    api.set_campaign(
        config(500, Some("500"), 9, &[1]),
        stats(500, vec![item(1, 160, 6)]),
    );
    orch.sync_shop(&shop).await.unwrap();

    let events = ChangeEventRepo::list_for_campaign(&pool, shop.id, 500, 10)
        .await
        .unwrap();
    assert!(events.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn untracked_campaign_type_is_skipped_entirely(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    // Type code 4 is not a placement the pipeline tracks.
    let mut untracked = config(600, Some("400"), 9, &[5]);
    untracked.campaign_type = 4;
    api.set_campaign(untracked, stats(600, vec![item(5, 10, 1)]));

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    orch.sync_shop(&shop).await.expect("cycle succeeds");

    // No state, no events, no ledger rows.
    assert!(CampaignStateRepo::get(&pool, shop.id, 600).await.unwrap().is_none());
    let events = ChangeEventRepo::list_for_campaign(&pool, shop.id, 600, 10)
        .await
        .unwrap();
    assert!(events.is_empty());
    assert_eq!(HistoryRepo::count_for_campaign(&pool, shop.id, 600).await.unwrap(), 0);

    assert_eq!(shop_status(&pool, shop.id).await, 1); // active
}

#[sqlx::test(migrations = "../../migrations")]
async fn stats_spacing_carries_over_between_cycles(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.set_campaign(
        config(500, Some("500"), 9, &[1]),
        stats(500, vec![item(1, 100, 5)]),
    );

    let orch = Orchestrator::new(
        pool.clone(),
        Arc::clone(&api),
        Arc::new(EventBus::default()),
        fast_retry(),
        Duration::from_millis(150),
    );

    // Back-to-back cycles, as after an overrunning cycle: the second
    // statistics call must still wait out the spacing.
    orch.sync_shop(&shop).await.unwrap();
    orch.sync_shop(&shop).await.unwrap();

    let calls = api.stats_called_at.lock().unwrap();
    assert_eq!(calls.len(), 2);
    // Generous margin below the configured 150ms; a limiter rebuilt
    // per cycle would let the second call through immediately.
    assert!(
        calls[1] - calls[0] >= Duration::from_millis(100),
        "statistics calls {:?} apart",
        calls[1] - calls[0],
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn auth_failure_degrades_the_shop(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.reject_auth.store(true, Ordering::SeqCst);

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    let result = orch.sync_shop(&shop).await;

    assert_matches!(result, Err(SyncError::Api(MarketplaceError::Auth(_))));
    assert_eq!(shop_status(&pool, shop.id).await, 2); // auth_error
}

#[sqlx::test(migrations = "../../migrations")]
async fn campaign_failure_does_not_abort_siblings(pool: PgPool) {
    let shop = seed_shop(&pool).await;
    let api = Arc::new(ScriptedApi::default());
    api.set_campaign(
        config(500, Some("500"), 9, &[1]),
        stats(500, vec![item(1, 100, 5)]),
    );
    api.set_campaign(
        config(501, Some("300"), 9, &[2]),
        stats(501, vec![item(2, 50, 2)]),
    );
    api.broken_stats.lock().unwrap().push(501);

    let orch = orchestrator(pool.clone(), Arc::clone(&api));
    // A single campaign failure is not a shop-cycle failure.
    orch.sync_shop(&shop).await.expect("cycle succeeds");

    // The healthy campaign progressed.
    assert_eq!(HistoryRepo::count_for_campaign(&pool, shop.id, 500).await.unwrap(), 1);
    // The broken one left no partial ledger writes or state.
    assert_eq!(HistoryRepo::count_for_campaign(&pool, shop.id, 501).await.unwrap(), 0);
    assert!(CampaignStateRepo::get(&pool, shop.id, 501).await.unwrap().is_none());

    assert_eq!(shop_status(&pool, shop.id).await, 1); // active
}
