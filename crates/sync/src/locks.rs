//! Per-(shop, campaign) mutual exclusion.
//!
//! Change detection for a single key must be strictly serialized:
//! two concurrent diffs against the same stored state would corrupt
//! the debounce logic (e.g. double-counting a bid change). Across
//! different keys no ordering is required.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use advsync_core::types::{CampaignId, ShopId};

/// Keyed lock map handing out one mutex per (shop, campaign).
///
/// Lock entries are created on first use and kept for the process
/// lifetime; the tracked campaign population is small and stable.
#[derive(Default)]
pub struct CampaignLocks {
    locks: Mutex<HashMap<(ShopId, CampaignId), Arc<Mutex<()>>>>,
}

impl CampaignLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one key, waiting if another task holds it.
    pub async fn acquire(&self, shop_id: ShopId, campaign_id: CampaignId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(
                locks
                    .entry((shop_id, campaign_id))
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}
