//! Broadcast channel wrapper for the campaign change stream.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ChangeNotice`]s,
//! shared via `Arc<EventBus>` between the orchestrator and its
//! in-process consumers.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast;

use advsync_core::detector::{ChangeKind, DetectedChange};
use advsync_core::types::{CampaignId, ItemId, ShopId, Timestamp};

/// A change event as broadcast to in-process subscribers.
///
/// Published after the durable write succeeds, so every notice
/// corresponds to a row in `change_events`.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeNotice {
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    /// `None` for campaign-level changes (bid, status).
    pub item_id: Option<ItemId>,
    pub kind: ChangeKind,
    pub old_value: String,
    pub new_value: String,
    /// Free-form context, e.g. campaign type or view counts.
    pub metadata: serde_json::Value,
    /// When the change was detected (UTC).
    pub occurred_at: Timestamp,
}

impl ChangeNotice {
    /// Wrap a detector result for broadcast.
    pub fn from_detected(
        shop_id: ShopId,
        campaign_id: CampaignId,
        change: &DetectedChange,
    ) -> Self {
        Self {
            shop_id,
            campaign_id,
            item_id: change.item_id,
            kind: change.kind,
            old_value: change.old_value.clone(),
            new_value: change.new_value.clone(),
            metadata: change.metadata.clone(),
            occurred_at: Utc::now(),
        }
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Publish/subscribe hub for campaign change notices.
///
/// Every subscriber independently receives every published
/// [`ChangeNotice`]; slow subscribers may observe lag, never block
/// the publisher.
pub struct EventBus {
    sender: broadcast::Sender<ChangeNotice>,
}

impl EventBus {
    /// Create a bus with an explicit channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all future notices.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotice> {
        self.sender.subscribe()
    }

    /// Publish a notice to all current subscribers.
    ///
    /// Publishing with no subscribers is a silent no-op.
    pub fn publish(&self, notice: ChangeNotice) {
        // send only errors when there are no receivers.
        let _ = self.sender.send(notice);
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
