//! Advert history ledger entity.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use advsync_core::types::{CampaignId, ItemId, ShopId, Timestamp};

/// A row from the `advert_history` ledger.
///
/// Never updated or deleted in place; each sync cycle appends a fully
/// independent batch with its own `fetched_at`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub fetched_at: Timestamp,
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    pub item_id: ItemId,
    pub vendor_code: String,
    pub campaign_type: i16,
    pub views: i64,
    pub clicks: i64,
    pub ctr: Decimal,
    pub spend: Decimal,
    pub cpc: Decimal,
    pub orders: i64,
    pub revenue: Decimal,
    pub cpm: Decimal,
    /// `true` = halo credit (item was not an official campaign target).
    pub is_associated: bool,
}
