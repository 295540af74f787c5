//! HTTP implementation of [`AdvertApi`] over `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use advsync_core::types::CampaignId;

use crate::api::{AdvertApi, ShopAuth};
use crate::error::MarketplaceError;
use crate::models::{CampaignConfig, CampaignRef, CampaignStats};

/// Default per-call timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the marketplace advert API.
///
/// One instance serves all shops; credentials travel per call via
/// [`ShopAuth`].
pub struct MarketplaceClient {
    http: reqwest::Client,
    base_url: String,
}

impl MarketplaceClient {
    /// Create a client with the default per-call timeout.
    ///
    /// * `base_url` - API origin, e.g. `https://advert-api.example.com`.
    pub fn new(base_url: String) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with an explicit per-call timeout.
    pub fn with_timeout(base_url: String, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { http, base_url }
    }

    /// Issue a GET and decode the JSON body, mapping the upstream
    /// status codes onto the error taxonomy.
    async fn get_json<T: DeserializeOwned>(
        &self,
        auth: &ShopAuth,
        path: &str,
    ) -> Result<T, MarketplaceError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    MarketplaceError::Transient(e.to_string())
                } else {
                    MarketplaceError::Api {
                        status: 0,
                        body: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| MarketplaceError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => MarketplaceError::Auth(body),
            429 => MarketplaceError::RateLimited,
            s if status.is_server_error() => {
                MarketplaceError::Transient(format!("upstream {s}: {body}"))
            }
            s => MarketplaceError::Api { status: s, body },
        })
    }
}

#[async_trait]
impl AdvertApi for MarketplaceClient {
    async fn list_campaigns(&self, auth: &ShopAuth) -> Result<Vec<CampaignRef>, MarketplaceError> {
        self.get_json(auth, "/adv/v1/campaigns").await
    }

    async fn fetch_config(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
    ) -> Result<CampaignConfig, MarketplaceError> {
        self.get_json(auth, &format!("/adv/v1/campaigns/{campaign_id}"))
            .await
    }

    async fn fetch_stats(
        &self,
        auth: &ShopAuth,
        campaign_id: CampaignId,
    ) -> Result<CampaignStats, MarketplaceError> {
        self.get_json(auth, &format!("/adv/v1/campaigns/{campaign_id}/fullstat"))
            .await
    }
}
