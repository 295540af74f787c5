//! Typed client for the external marketplace advertising API.
//!
//! Provides the [`AdvertApi`] trait consumed by the sync orchestrator,
//! its HTTP implementation [`MarketplaceClient`], wire DTOs, the error
//! taxonomy, bounded exponential-backoff retries, and the shared
//! per-shop rate limiter for the statistics endpoint.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod retry;

pub use api::{AdvertApi, ShopAuth};
pub use client::MarketplaceClient;
pub use error::MarketplaceError;
pub use models::{CampaignConfig, CampaignRef, CampaignStats, ItemStats};
pub use rate_limit::RateLimiter;
pub use retry::{with_retry, RetryConfig};
