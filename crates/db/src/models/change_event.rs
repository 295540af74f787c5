//! Change event entities (append-only).

use serde::Serialize;
use sqlx::FromRow;

use advsync_core::detector::{ChangeKind, DetectedChange};
use advsync_core::types::{CampaignId, ItemId, ShopId, Timestamp};

/// A row from the `change_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeEvent {
    pub id: i64,
    pub created_at: Timestamp,
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    /// `None` for campaign-level events (bid, status).
    pub item_id: Option<ItemId>,
    pub event_type: String,
    pub old_value: String,
    pub new_value: String,
    pub metadata: serde_json::Value,
}

/// Insert DTO for a change event.
#[derive(Debug, Clone, Serialize)]
pub struct NewChangeEvent {
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    pub item_id: Option<ItemId>,
    pub event_type: ChangeKind,
    pub old_value: String,
    pub new_value: String,
    pub metadata: serde_json::Value,
}

impl NewChangeEvent {
    /// Lift a detector result into an insertable event.
    pub fn from_detected(shop_id: ShopId, campaign_id: CampaignId, change: DetectedChange) -> Self {
        Self {
            shop_id,
            campaign_id,
            item_id: change.item_id,
            event_type: change.kind,
            old_value: change.old_value,
            new_value: change.new_value,
            metadata: change.metadata,
        }
    }
}
