//! Builder for append-only advert history rows.
//!
//! Transforms one campaign's statistics payload into the rows appended
//! to the `advert_history` ledger: vendor codes resolved (empty when
//! unknown), cost-per-click derived with a division guard, and each
//! row labelled by the halo-attribution classifier.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::Decimal;

use crate::attribution::is_halo;
use crate::campaign::CampaignType;
use crate::types::{CampaignId, ItemId, ShopId, Timestamp};

/// Per-item metrics from one statistics fetch.
#[derive(Debug, Clone)]
pub struct ItemMetrics {
    pub item_id: ItemId,
    pub views: i64,
    pub clicks: i64,
    pub ctr: Decimal,
    pub spend: Decimal,
    pub orders: i64,
    pub revenue: Decimal,
}

/// One ledger row, ready for insertion. Immutable once appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRow {
    /// Capture timestamp — uniform across all rows of one cycle, and
    /// distinct from the metrics' own reporting date.
    pub fetched_at: Timestamp,
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    pub item_id: ItemId,
    /// Seller SKU code; empty when the lookup had no entry.
    pub vendor_code: String,
    pub campaign_type: CampaignType,
    pub views: i64,
    pub clicks: i64,
    pub ctr: Decimal,
    pub spend: Decimal,
    pub cpc: Decimal,
    pub orders: i64,
    pub revenue: Decimal,
    /// Bid value effective at capture time.
    pub cpm: Decimal,
    /// `true` = halo credit: the item was not an official target.
    pub is_associated: bool,
}

/// Cost per click, guarded against zero clicks.
pub fn guarded_cpc(spend: Decimal, clicks: i64) -> Decimal {
    if clicks > 0 {
        spend / Decimal::from(clicks)
    } else {
        Decimal::ZERO
    }
}

/// Build the ledger rows for one campaign and one capture.
///
/// * `official_items` — the item set from the same cycle's
///   configuration fetch; drives the halo flag.
/// * `vendor_codes` — read-only item → seller SKU lookup; a missing
///   entry yields an empty code rather than failing the batch.
/// * `fetched_at` — the orchestrator's cycle start time.
#[allow(clippy::too_many_arguments)]
pub fn build_history_rows(
    shop_id: ShopId,
    campaign_id: CampaignId,
    fetched_at: Timestamp,
    stats: &[ItemMetrics],
    official_items: &BTreeSet<ItemId>,
    campaign_type: CampaignType,
    cpm: Decimal,
    vendor_codes: &HashMap<ItemId, String>,
) -> Vec<NewHistoryRow> {
    stats
        .iter()
        .map(|item| NewHistoryRow {
            fetched_at,
            shop_id,
            campaign_id,
            item_id: item.item_id,
            vendor_code: vendor_codes.get(&item.item_id).cloned().unwrap_or_default(),
            campaign_type,
            views: item.views,
            clicks: item.clicks,
            ctr: item.ctr,
            spend: item.spend,
            cpc: guarded_cpc(item.spend, item.clicks),
            orders: item.orders,
            revenue: item.revenue,
            cpm,
            is_associated: is_halo(official_items, item.item_id),
        })
        .collect()
}
