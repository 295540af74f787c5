//! Integration tests for the campaign state store and event log.
//!
//! Exercises the repository layer against a real database:
//! - Tri-state reads (absent vs. present)
//! - Full-overwrite upsert semantics
//! - Per-item view counters
//! - Append-only change events and filtered listing

use std::collections::BTreeSet;

use rust_decimal_macros::dec;
use serde_json::json;
use sqlx::PgPool;

use advsync_core::campaign::{CampaignState, CampaignType};
use advsync_core::detector::ChangeKind;
use advsync_db::models::change_event::NewChangeEvent;
use advsync_db::repositories::{CampaignItemViewRepo, CampaignStateRepo, ChangeEventRepo};

async fn seed_shop(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO shops (name, api_token) VALUES ($1, $2) RETURNING id")
        .bind("test-shop")
        .bind("token")
        .fetch_one(pool)
        .await
        .expect("insert shop")
}

fn state(shop_id: i64, campaign_id: i64, items: &[i64]) -> CampaignState {
    CampaignState {
        shop_id,
        campaign_id,
        cpm: dec!(500),
        status: 9,
        items: items.iter().copied().collect(),
        campaign_type: CampaignType::Search,
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn unseen_campaign_reads_as_none(pool: PgPool) {
    let shop_id = seed_shop(&pool).await;
    let row = CampaignStateRepo::get(&pool, shop_id, 500).await.unwrap();
    assert!(row.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_then_get_roundtrips(pool: PgPool) {
    let shop_id = seed_shop(&pool).await;
    CampaignStateRepo::upsert(&pool, &state(shop_id, 500, &[1, 2]))
        .await
        .unwrap();

    let row = CampaignStateRepo::get(&pool, shop_id, 500)
        .await
        .unwrap()
        .expect("state present");
    let loaded = row.into_state().expect("known campaign type");

    assert_eq!(loaded.cpm, dec!(500));
    assert_eq!(loaded.status, 9);
    assert_eq!(loaded.items, [1, 2].into_iter().collect::<BTreeSet<_>>());
    assert_eq!(loaded.campaign_type, CampaignType::Search);
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_overwrites_the_full_state(pool: PgPool) {
    let shop_id = seed_shop(&pool).await;
    CampaignStateRepo::upsert(&pool, &state(shop_id, 500, &[1, 2]))
        .await
        .unwrap();

    let mut updated = state(shop_id, 500, &[1, 3]);
    updated.cpm = dec!(550);
    updated.status = 11;
    CampaignStateRepo::upsert(&pool, &updated).await.unwrap();

    let loaded = CampaignStateRepo::get(&pool, shop_id, 500)
        .await
        .unwrap()
        .unwrap()
        .into_state()
        .unwrap();
    assert_eq!(loaded.cpm, dec!(550));
    assert_eq!(loaded.status, 11);
    assert_eq!(loaded.items, [1, 3].into_iter().collect::<BTreeSet<_>>());
}

#[sqlx::test(migrations = "../../migrations")]
async fn view_counters_upsert_and_read_back(pool: PgPool) {
    let shop_id = seed_shop(&pool).await;

    let absent = CampaignItemViewRepo::get_last_views(&pool, shop_id, 500, 7)
        .await
        .unwrap();
    assert_eq!(absent, None);

    CampaignItemViewRepo::set_last_views(&pool, shop_id, 500, 7, 100)
        .await
        .unwrap();
    CampaignItemViewRepo::set_last_views(&pool, shop_id, 500, 7, 150)
        .await
        .unwrap();

    let views = CampaignItemViewRepo::get_last_views(&pool, shop_id, 500, 7)
        .await
        .unwrap();
    assert_eq!(views, Some(150));

    let all = CampaignItemViewRepo::list_for_campaign(&pool, shop_id, 500)
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].item_id, 7);
}

#[sqlx::test(migrations = "../../migrations")]
async fn change_events_append_and_list(pool: PgPool) {
    let shop_id = seed_shop(&pool).await;

    let bid = NewChangeEvent {
        shop_id,
        campaign_id: 500,
        item_id: None,
        event_type: ChangeKind::BidChange,
        old_value: "500".into(),
        new_value: "550".into(),
        metadata: json!({ "campaign_type": "search" }),
    };
    let add = NewChangeEvent {
        shop_id,
        campaign_id: 500,
        item_id: Some(3),
        event_type: ChangeKind::ItemAdd,
        old_value: String::new(),
        new_value: "3".into(),
        metadata: json!({}),
    };

    let first_id = ChangeEventRepo::insert(&pool, &bid).await.unwrap();
    let second_id = ChangeEventRepo::insert(&pool, &add).await.unwrap();
    assert!(second_id > first_id);

    let events = ChangeEventRepo::list_for_campaign(&pool, shop_id, 500, 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    // Newest first.
    assert_eq!(events[0].event_type, "item_add");
    assert_eq!(events[0].item_id, Some(3));
    assert_eq!(events[1].event_type, "bid_change");
    assert_eq!(events[1].old_value, "500");
    assert_eq!(events[1].new_value, "550");
}
