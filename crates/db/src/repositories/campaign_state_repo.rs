//! Repository for the `campaign_states` and `campaign_item_views`
//! tables — the campaign state store.
//!
//! Reads are tri-state: `Ok(Some)` found, `Ok(None)` not found,
//! `Err` store unavailable. Writes are full overwrites per key;
//! there is no multi-key transactional guarantee.

use sqlx::PgPool;

use advsync_core::campaign::CampaignState;
use advsync_core::types::{CampaignId, ItemId, ShopId};

use crate::models::campaign_state::{CampaignStateRow, ItemViewRow};

/// Column list for `campaign_states` queries.
const STATE_COLUMNS: &str = "shop_id, campaign_id, cpm, status, campaign_type, items, updated_at";

/// Provides read/write operations for the campaign state store.
pub struct CampaignStateRepo;

impl CampaignStateRepo {
    /// Load the last observed state for one (shop, campaign) key.
    pub async fn get(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
    ) -> Result<Option<CampaignStateRow>, sqlx::Error> {
        let query = format!(
            "SELECT {STATE_COLUMNS} FROM campaign_states \
             WHERE shop_id = $1 AND campaign_id = $2"
        );
        sqlx::query_as::<_, CampaignStateRow>(&query)
            .bind(shop_id)
            .bind(campaign_id)
            .fetch_optional(pool)
            .await
    }

    /// Write the full state for one key, inserting or overwriting.
    pub async fn upsert(pool: &PgPool, state: &CampaignState) -> Result<(), sqlx::Error> {
        let items: Vec<ItemId> = state.items.iter().copied().collect();
        sqlx::query(
            "INSERT INTO campaign_states \
                (shop_id, campaign_id, cpm, status, campaign_type, items, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, now()) \
             ON CONFLICT (shop_id, campaign_id) DO UPDATE SET \
                cpm = EXCLUDED.cpm, \
                status = EXCLUDED.status, \
                campaign_type = EXCLUDED.campaign_type, \
                items = EXCLUDED.items, \
                updated_at = now()",
        )
        .bind(state.shop_id)
        .bind(state.campaign_id)
        .bind(state.cpm)
        .bind(state.status)
        .bind(state.campaign_type.code())
        .bind(&items)
        .execute(pool)
        .await?;
        Ok(())
    }
}

/// Provides read/write operations for per-item view counters.
pub struct CampaignItemViewRepo;

impl CampaignItemViewRepo {
    /// All stored view counters for one campaign.
    pub async fn list_for_campaign(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
    ) -> Result<Vec<ItemViewRow>, sqlx::Error> {
        sqlx::query_as::<_, ItemViewRow>(
            "SELECT item_id, last_views FROM campaign_item_views \
             WHERE shop_id = $1 AND campaign_id = $2",
        )
        .bind(shop_id)
        .bind(campaign_id)
        .fetch_all(pool)
        .await
    }

    /// The stored counter for one item, if any.
    pub async fn get_last_views(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
        item_id: ItemId,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT last_views FROM campaign_item_views \
             WHERE shop_id = $1 AND campaign_id = $2 AND item_id = $3",
        )
        .bind(shop_id)
        .bind(campaign_id)
        .bind(item_id)
        .fetch_optional(pool)
        .await
    }

    /// Upsert one item's view counter.
    pub async fn set_last_views(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
        item_id: ItemId,
        views: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO campaign_item_views (shop_id, campaign_id, item_id, last_views) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (shop_id, campaign_id, item_id) \
             DO UPDATE SET last_views = EXCLUDED.last_views",
        )
        .bind(shop_id)
        .bind(campaign_id)
        .bind(item_id)
        .bind(views)
        .execute(pool)
        .await?;
        Ok(())
    }
}
