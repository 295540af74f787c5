//! Campaign state store entities.

use rust_decimal::Decimal;
use sqlx::FromRow;

use advsync_core::campaign::{CampaignState, CampaignType};
use advsync_core::types::{CampaignId, ItemId, ShopId, Timestamp};

/// A row from the `campaign_states` table.
///
/// `items` is stored as a `BIGINT[]`; ordering in the column is not
/// meaningful, the domain type normalizes it into a set.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignStateRow {
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    pub cpm: Decimal,
    pub status: i16,
    pub campaign_type: i16,
    pub items: Vec<ItemId>,
    pub updated_at: Timestamp,
}

impl CampaignStateRow {
    /// Convert into the domain state.
    ///
    /// Returns `None` when the stored `campaign_type` code is not one
    /// the pipeline tracks (a row written by a newer schema, or a
    /// corrupt value). Callers treat that as a hard error, not as an
    /// absent state.
    pub fn into_state(self) -> Option<CampaignState> {
        Some(CampaignState {
            shop_id: self.shop_id,
            campaign_id: self.campaign_id,
            cpm: self.cpm,
            status: self.status,
            items: self.items.into_iter().collect(),
            campaign_type: CampaignType::from_code(self.campaign_type)?,
        })
    }
}

/// A row from the `campaign_item_views` counter table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemViewRow {
    pub item_id: ItemId,
    pub last_views: i64,
}
