//! In-memory vendor-code cache.
//!
//! Maps item id to seller SKU code for history enrichment. The
//! backing table is refreshed out-of-band from the financial facts
//! import; the cache is re-read once per shop cycle. A failed refresh
//! keeps the previous cycle's data — a stale code beats an empty one.

use std::collections::HashMap;

use tokio::sync::RwLock;

use advsync_core::types::{ItemId, ShopId};
use advsync_db::repositories::VendorCodeRepo;
use advsync_db::DbPool;

/// Per-shop item → vendor code lookup.
#[derive(Default)]
pub struct VendorCodeCache {
    codes: RwLock<HashMap<ItemId, String>>,
}

impl VendorCodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the mapping from the database.
    ///
    /// On failure the existing data is kept and a warning is logged.
    pub async fn refresh(&self, pool: &DbPool, shop_id: ShopId) {
        match VendorCodeRepo::list_for_shop(pool, shop_id).await {
            Ok(rows) => {
                let map: HashMap<ItemId, String> = rows
                    .into_iter()
                    .map(|row| (row.item_id, row.vendor_code))
                    .collect();
                tracing::debug!(shop_id, entries = map.len(), "Vendor code cache refreshed");
                *self.codes.write().await = map;
            }
            Err(e) => {
                tracing::warn!(
                    shop_id,
                    error = %e,
                    "Vendor code refresh failed, keeping stale data",
                );
            }
        }
    }

    /// Install a mapping directly. Used by tests and warm starts.
    pub async fn install(&self, map: HashMap<ItemId, String>) {
        *self.codes.write().await = map;
    }

    /// Clone the current mapping for one cycle's row building.
    pub async fn snapshot(&self) -> HashMap<ItemId, String> {
        self.codes.read().await.clone()
    }
}
