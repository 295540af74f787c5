//! Repository for the `advert_history` ledger.
//!
//! Append-only: no update or delete paths exist by design. Batches
//! are appended inside a transaction so a mid-batch failure never
//! leaves a campaign's capture half-written. The unique capture key
//! `(shop_id, campaign_id, item_id, fetched_at)` plus
//! `ON CONFLICT DO NOTHING` makes a retried cycle idempotent.

use sqlx::PgPool;

use advsync_core::history::NewHistoryRow;
use advsync_core::types::{CampaignId, ShopId, Timestamp};

use crate::models::history::HistoryRow;

/// Column list for `advert_history` queries.
const COLUMNS: &str = "id, fetched_at, shop_id, campaign_id, item_id, \
     vendor_code, campaign_type, views, clicks, ctr, spend, cpc, \
     orders, revenue, cpm, is_associated";

/// Provides append and range-scan operations for the ledger.
pub struct HistoryRepo;

impl HistoryRepo {
    /// Append one campaign's capture batch atomically.
    ///
    /// Returns the number of rows actually inserted (rows already
    /// present from a previously retried cycle are skipped).
    pub async fn insert_batch(
        pool: &PgPool,
        rows: &[NewHistoryRow],
    ) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut tx = pool.begin().await?;
        let mut inserted = 0u64;

        for row in rows {
            let result = sqlx::query(
                "INSERT INTO advert_history \
                    (fetched_at, shop_id, campaign_id, item_id, vendor_code, \
                     campaign_type, views, clicks, ctr, spend, cpc, \
                     orders, revenue, cpm, is_associated) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
                 ON CONFLICT (shop_id, campaign_id, item_id, fetched_at) DO NOTHING",
            )
            .bind(row.fetched_at)
            .bind(row.shop_id)
            .bind(row.campaign_id)
            .bind(row.item_id)
            .bind(&row.vendor_code)
            .bind(row.campaign_type.code())
            .bind(row.views)
            .bind(row.clicks)
            .bind(row.ctr)
            .bind(row.spend)
            .bind(row.cpc)
            .bind(row.orders)
            .bind(row.revenue)
            .bind(row.cpm)
            .bind(row.is_associated)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Range scan for one campaign ordered by capture time then item.
    pub async fn query_range(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<HistoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM advert_history \
             WHERE shop_id = $1 AND campaign_id = $2 \
               AND fetched_at >= $3 AND fetched_at <= $4 \
             ORDER BY fetched_at, item_id"
        );
        sqlx::query_as::<_, HistoryRow>(&query)
            .bind(shop_id)
            .bind(campaign_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Total ledger rows for one campaign. Used by tests and checks.
    pub async fn count_for_campaign(
        pool: &PgPool,
        shop_id: ShopId,
        campaign_id: CampaignId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM advert_history WHERE shop_id = $1 AND campaign_id = $2",
        )
        .bind(shop_id)
        .bind(campaign_id)
        .fetch_one(pool)
        .await
    }
}
