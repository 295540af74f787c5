//! Campaign snapshot diffing.
//!
//! [`detect_changes`] compares a freshly fetched campaign
//! configuration against the last stored [`CampaignState`] and
//! produces the change events that actually occurred, plus the state
//! to persist for the next cycle. Each field is evaluated
//! independently: a bid value that fails validation suppresses only
//! the bid comparison, never the status or item diffs.
//!
//! First sight of a campaign is a seeding step, not a diff — callers
//! use [`seed_state`] and emit nothing.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::bid::parse_bid;
use crate::campaign::{CampaignSnapshot, CampaignState};
use crate::types::{CampaignId, ItemId, ShopId};

/// The kind of change detected between two campaign snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The bid changed to a new, validated value.
    BidChange,
    /// The upstream status code changed.
    StatusChange,
    /// An item joined the official campaign item set.
    ItemAdd,
    /// An item left the official campaign item set.
    ItemRemove,
    /// An item's view counter did not grow since the last observation.
    ItemInactive,
}

impl ChangeKind {
    /// String representation for display, logging, and database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BidChange => "bid_change",
            Self::StatusChange => "status_change",
            Self::ItemAdd => "item_add",
            Self::ItemRemove => "item_remove",
            Self::ItemInactive => "item_inactive",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One change event produced by a diff pass.
///
/// `old_value` / `new_value` are opaque strings whose meaning depends
/// on [`ChangeKind`]. `item_id` is `None` for campaign-level events.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedChange {
    pub kind: ChangeKind,
    pub item_id: Option<ItemId>,
    pub old_value: String,
    pub new_value: String,
    /// Open key-value context, e.g. campaign type or view counts.
    pub metadata: serde_json::Value,
}

/// Result of one diff pass over a tracked campaign.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Events in deterministic order: bid, status, removes, adds,
    /// inactivity (item-ordered within each group).
    pub events: Vec<DetectedChange>,
    /// The state to persist for the next cycle.
    pub next_state: CampaignState,
    /// Per-item view counter writes (applied even when no event fired,
    /// so stale baselines never suppress or amplify later alerts).
    pub view_updates: Vec<(ItemId, i64)>,
}

/// Build the initial state for a campaign seen for the first time.
///
/// Emits no events; there is nothing to diff against. An invalid bid
/// seeds as zero and is replaced by the first validated value.
pub fn seed_state(
    shop_id: ShopId,
    campaign_id: CampaignId,
    fetched: &CampaignSnapshot,
) -> CampaignState {
    CampaignState {
        shop_id,
        campaign_id,
        cpm: parse_bid(fetched.raw_cpm.as_deref()).unwrap_or(Decimal::ZERO),
        status: fetched.status,
        items: fetched.items.clone(),
        campaign_type: fetched.campaign_type,
    }
}

/// Diff a fetched snapshot against the stored state.
///
/// * `current_views` — per-item view counts from the same cycle's
///   statistics fetch (not from the configuration payload).
/// * `last_views` — the stored per-item counters from the previous
///   observation.
pub fn detect_changes(
    prior: &CampaignState,
    fetched: &CampaignSnapshot,
    current_views: &HashMap<ItemId, i64>,
    last_views: &HashMap<ItemId, i64>,
) -> Detection {
    let meta = json!({ "campaign_type": fetched.campaign_type.as_str() });
    let mut events = Vec::new();

    let (effective_cpm, bid_event) = evaluate_bid(prior.cpm, fetched.raw_cpm.as_deref(), &meta);
    events.extend(bid_event);
    events.extend(evaluate_status(prior.status, fetched.status, &meta));

    // Set differences over the official item lists.
    for &item_id in prior.items.difference(&fetched.items) {
        events.push(DetectedChange {
            kind: ChangeKind::ItemRemove,
            item_id: Some(item_id),
            old_value: item_id.to_string(),
            new_value: String::new(),
            metadata: meta.clone(),
        });
    }
    for &item_id in fetched.items.difference(&prior.items) {
        events.push(DetectedChange {
            kind: ChangeKind::ItemAdd,
            item_id: Some(item_id),
            old_value: String::new(),
            new_value: item_id.to_string(),
            metadata: meta.clone(),
        });
    }

    // Inactivity check for items surviving in both sets.
    let mut view_updates = Vec::new();
    for &item_id in prior.items.intersection(&fetched.items) {
        let Some(&views) = current_views.get(&item_id) else {
            continue;
        };
        if let Some(&baseline) = last_views.get(&item_id) {
            if views <= baseline {
                events.push(DetectedChange {
                    kind: ChangeKind::ItemInactive,
                    item_id: Some(item_id),
                    old_value: baseline.to_string(),
                    new_value: views.to_string(),
                    metadata: json!({
                        "campaign_type": fetched.campaign_type.as_str(),
                        "reason": "views_not_increasing",
                    }),
                });
            }
        }
        // The counter advances regardless of whether an event fired.
        view_updates.push((item_id, views));
    }

    let next_state = CampaignState {
        shop_id: prior.shop_id,
        campaign_id: prior.campaign_id,
        cpm: effective_cpm,
        status: fetched.status,
        items: fetched.items.clone(),
        campaign_type: fetched.campaign_type,
    };

    Detection {
        events,
        next_state,
        view_updates,
    }
}

/// Bid comparison behind debounce-by-validation.
///
/// Returns the cpm to persist (the validated new value, or the stored
/// one when the fetched value is unusable) and at most one event.
fn evaluate_bid(
    stored: Decimal,
    raw: Option<&str>,
    meta: &serde_json::Value,
) -> (Decimal, Option<DetectedChange>) {
    match parse_bid(raw) {
        Some(fetched) if fetched != stored => {
            let event = DetectedChange {
                kind: ChangeKind::BidChange,
                item_id: None,
                old_value: stored.to_string(),
                new_value: fetched.to_string(),
                metadata: meta.clone(),
            };
            (fetched, Some(event))
        }
        Some(_) => (stored, None),
        // Invalid fetched value: keep the last known-good bid.
        None => (stored, None),
    }
}

/// Status comparison. Codes are upstream enumerations, so any
/// difference is a real change — no debounce.
fn evaluate_status(stored: i16, fetched: i16, meta: &serde_json::Value) -> Option<DetectedChange> {
    (stored != fetched).then(|| DetectedChange {
        kind: ChangeKind::StatusChange,
        item_id: None,
        old_value: stored.to_string(),
        new_value: fetched.to_string(),
        metadata: meta.clone(),
    })
}
