//! The advert API trait consumed by the sync orchestrator.
//!
//! The orchestrator is written against this trait so that tests can
//! drive a full sync cycle from a scripted in-memory implementation.

use async_trait::async_trait;

use advsync_core::types::{CampaignId, ShopId};

use crate::error::MarketplaceError;
use crate::models::{CampaignConfig, CampaignRef, CampaignStats};

/// Per-shop credentials for the advert API.
#[derive(Debug, Clone)]
pub struct ShopAuth {
    pub shop_id: ShopId,
    /// Bearer token issued by the marketplace.
    pub token: String,
}

/// The two logical calls the sync pipeline makes per campaign per
/// cycle, plus campaign discovery.
#[async_trait]
pub trait AdvertApi: Send + Sync {
    /// List the shop's advert campaigns.
    async fn list_campaigns(&self, auth: &ShopAuth) -> Result<Vec<CampaignRef>, MarketplaceError>;

    /// Fetch one campaign's current configuration.
    async fn fetch_config(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
    ) -> Result<CampaignConfig, MarketplaceError>;

    /// Fetch one campaign's per-item performance statistics.
    ///
    /// Callers must space these calls through the shared
    /// [`RateLimiter`](crate::rate_limit::RateLimiter) — the upstream
    /// ceiling is roughly one call per minute per shop.
    async fn fetch_stats(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
    ) -> Result<CampaignStats, MarketplaceError>;
}
