//! Repository for the `vendor_codes` lookup table.
//!
//! Read-only from the sync pipeline's point of view; the table is
//! refreshed out-of-band from the financial facts import.

use sqlx::{FromRow, PgPool};

use advsync_core::types::{ItemId, ShopId};

/// One item → seller SKU mapping.
#[derive(Debug, Clone, FromRow)]
pub struct VendorCodeRow {
    pub item_id: ItemId,
    pub vendor_code: String,
}

/// Provides vendor code lookups for history enrichment.
pub struct VendorCodeRepo;

impl VendorCodeRepo {
    /// All mappings for one shop, used to warm the in-memory cache.
    pub async fn list_for_shop(
        pool: &PgPool,
        shop_id: ShopId,
    ) -> Result<Vec<VendorCodeRow>, sqlx::Error> {
        sqlx::query_as::<_, VendorCodeRow>(
            "SELECT item_id, vendor_code FROM vendor_codes WHERE shop_id = $1",
        )
        .bind(shop_id)
        .fetch_all(pool)
        .await
    }
}
