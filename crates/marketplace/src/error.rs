//! Error taxonomy for the marketplace advert API.

/// Errors from the marketplace API layer.
///
/// The taxonomy drives the orchestrator's recovery policy:
/// [`Auth`](Self::Auth) is never retried and degrades the shop,
/// [`RateLimited`](Self::RateLimited) and [`Transient`](Self::Transient)
/// are retried with backoff, everything else fails the campaign cycle.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    /// The API rejected the shop's credentials (401/403).
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// The API throttled the call (429).
    #[error("Rate limited by the API")]
    RateLimited,

    /// Network failure, timeout, or 5xx — worth retrying.
    #[error("Transient upstream error: {0}")]
    Transient(String),

    /// A non-retryable API error (other 4xx).
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode API response: {0}")]
    Decode(String),
}

impl MarketplaceError {
    /// Whether the retry policy should attempt this call again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Transient(_))
    }
}
