//! Repository for the `change_events` table (append-only).

use sqlx::PgPool;

use advsync_core::types::{CampaignId, ShopId, Timestamp};

use crate::models::change_event::{ChangeEvent, NewChangeEvent};

/// Column list for `change_events` queries.
const COLUMNS: &str = "id, created_at, shop_id, campaign_id, item_id, \
     event_type, old_value, new_value, metadata";

/// Provides append and query operations for change events.
pub struct ChangeEventRepo;

impl ChangeEventRepo {
    /// Append one event, returning the generated ID.
    pub async fn insert(pool: &PgPool, event: &NewChangeEvent) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO change_events \
                (shop_id, campaign_id, item_id, event_type, old_value, new_value, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id",
        )
        .bind(event.shop_id)
        .bind(event.campaign_id)
        .bind(event.item_id)
        .bind(event.event_type.as_str())
        .bind(&event.old_value)
        .bind(&event.new_value)
        .bind(&event.metadata)
        .fetch_one(pool)
        .await
    }

    /// List events for one campaign, newest first.
    pub async fn list_for_campaign(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
        limit: i64,
    ) -> Result<Vec<ChangeEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM change_events \
             WHERE shop_id = $1 AND campaign_id = $2 \
             ORDER BY created_at DESC, id DESC LIMIT $3"
        );
        sqlx::query_as::<_, ChangeEvent>(&query)
            .bind(shop_id)
            .bind(campaign_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List events of one type for a shop within a time range,
    /// newest first. Used by downstream reporting.
    pub async fn list_by_type(
        pool: &PgPool,
        shop_id: ShopId,
        event_type: &str,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ChangeEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM change_events \
             WHERE shop_id = $1 AND event_type = $2 \
               AND created_at >= $3 AND created_at <= $4 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ChangeEvent>(&query)
            .bind(shop_id)
            .bind(event_type)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}
