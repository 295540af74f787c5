//! Wire DTOs for the marketplace advert API.
//!
//! Field names follow the upstream JSON; conversions into the domain
//! types live here so the rest of the workspace never sees raw
//! payload shapes.

use rust_decimal::Decimal;
use serde::Deserialize;

use advsync_core::campaign::{CampaignSnapshot, CampaignType};
use advsync_core::history::ItemMetrics;
use advsync_core::types::{CampaignId, ItemId};

/// One entry from the campaign list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignRef {
    #[serde(rename = "advertId")]
    pub campaign_id: CampaignId,
    /// Upstream campaign type code.
    #[serde(rename = "type")]
    pub campaign_type: i16,
    pub status: i16,
}

/// Campaign configuration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignConfig {
    #[serde(rename = "advertId")]
    pub campaign_id: CampaignId,
    /// Raw bid value; empty or missing on upstream glitches.
    pub cpm: Option<String>,
    pub status: i16,
    #[serde(rename = "type")]
    pub campaign_type: i16,
    /// Official campaign item ids.
    #[serde(rename = "nms", default)]
    pub items: Vec<ItemId>,
}

impl CampaignConfig {
    /// Convert into a domain snapshot.
    ///
    /// Returns `None` for campaign types the pipeline does not track.
    pub fn into_snapshot(self) -> Option<CampaignSnapshot> {
        Some(CampaignSnapshot {
            raw_cpm: self.cpm,
            status: self.status,
            items: self.items.into_iter().collect(),
            campaign_type: CampaignType::from_code(self.campaign_type)?,
        })
    }
}

/// Per-item record from the statistics endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemStats {
    #[serde(rename = "nmId")]
    pub item_id: ItemId,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub clicks: i64,
    #[serde(default)]
    pub ctr: Decimal,
    #[serde(rename = "sum", default)]
    pub spend: Decimal,
    #[serde(default)]
    pub orders: i64,
    #[serde(rename = "sum_price", default)]
    pub revenue: Decimal,
}

impl From<ItemStats> for ItemMetrics {
    fn from(stats: ItemStats) -> Self {
        Self {
            item_id: stats.item_id,
            views: stats.views,
            clicks: stats.clicks,
            ctr: stats.ctr,
            spend: stats.spend,
            orders: stats.orders,
            revenue: stats.revenue,
        }
    }
}

/// Statistics payload for one campaign.
#[derive(Debug, Clone, Deserialize)]
pub struct CampaignStats {
    #[serde(rename = "advertId")]
    pub campaign_id: CampaignId,
    #[serde(rename = "days", default)]
    pub items: Vec<ItemStats>,
}
