//! Repository for the `shops` table.

use sqlx::PgPool;

use advsync_core::types::ShopId;

use crate::models::shop::{Shop, ShopStatus};

/// Column list for `shops` queries.
const COLUMNS: &str = "id, name, api_token, status, updated_at";

/// Provides shop lookup and status transitions for the orchestrator.
pub struct ShopRepo;

impl ShopRepo {
    /// Shops eligible for a sync cycle (active or mid-sync from a
    /// previous run that did not reset cleanly).
    pub async fn list_syncable(pool: &PgPool) -> Result<Vec<Shop>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shops WHERE status IN ($1, $2) ORDER BY id"
        );
        sqlx::query_as::<_, Shop>(&query)
            .bind(ShopStatus::Active.id())
            .bind(ShopStatus::Syncing.id())
            .fetch_all(pool)
            .await
    }

    /// Fetch one shop by id.
    pub async fn get(pool: &PgPool, shop_id: ShopId) -> Result<Option<Shop>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM shops WHERE id = $1");
        sqlx::query_as::<_, Shop>(&query)
            .bind(shop_id)
            .fetch_optional(pool)
            .await
    }

    /// Write a status transition.
    pub async fn set_status(
        pool: &PgPool,
        shop_id: ShopId,
        status: ShopStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE shops SET status = $1, updated_at = now() WHERE id = $2")
            .bind(status.id())
            .bind(shop_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
