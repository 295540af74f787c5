//! Campaign configuration types shared across the sync pipeline.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CampaignId, ItemId, ShopId};

/// Campaign placement type, using the upstream API's numeric codes.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    /// Search placement (code 6).
    Search = 6,
    /// Automatic placement (code 8).
    Auto = 8,
    /// Combined search + catalog placement (code 9).
    SearchCatalog = 9,
}

impl CampaignType {
    /// Map the upstream numeric type code to a variant.
    ///
    /// Returns `None` for codes the sync pipeline does not track.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            6 => Some(Self::Search),
            8 => Some(Self::Auto),
            9 => Some(Self::SearchCatalog),
            _ => None,
        }
    }

    /// The upstream numeric type code.
    pub fn code(self) -> i16 {
        self as i16
    }

    /// String representation for display, logging, and event metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Auto => "auto",
            Self::SearchCatalog => "search_catalog",
        }
    }
}

impl std::fmt::Display for CampaignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A freshly fetched campaign configuration, before validation.
///
/// The bid arrives as a raw string because the upstream API
/// occasionally returns empty or garbage values; [`crate::bid::parse_bid`]
/// decides whether it is usable.
#[derive(Debug, Clone)]
pub struct CampaignSnapshot {
    /// Raw bid value as returned by the API. `None` when the field was
    /// absent from the payload.
    pub raw_cpm: Option<String>,
    /// Upstream campaign status code.
    pub status: i16,
    /// Official campaign item set.
    pub items: BTreeSet<ItemId>,
    pub campaign_type: CampaignType,
}

/// The last observed state of one campaign, keyed by (shop, campaign).
///
/// Mutated only by the change-detection path: seeded on first sight,
/// then replaced after each successful diff pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignState {
    pub shop_id: ShopId,
    pub campaign_id: CampaignId,
    /// Last known-good bid. Invalid fetched values never land here.
    pub cpm: Decimal,
    pub status: i16,
    pub items: BTreeSet<ItemId>,
    pub campaign_type: CampaignType,
}
