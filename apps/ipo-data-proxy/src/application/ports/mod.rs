//! Port Interfaces
//!
//! Contracts between the proxy service and the outside world.
//!
//! ## Driven Ports (Outbound)
//!
//! - `MarketDataPort`: raw request/response access to the upstream provider

use async_trait::async_trait;

/// A single upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Path suffix appended to the provider base URL.
    pub endpoint: String,
    /// Optional `symbol` query parameter.
    pub symbol: Option<String>,
    /// Provider credential.
    pub api_key: String,
}

/// Status and body returned by the upstream provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Failures below the HTTP status level.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    /// The request could not be built (bad URL, bad header).
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    /// Connection, TLS or body read failure.
    #[error("upstream transport error: {0}")]
    Transport(String),
}

/// Port for the upstream market data provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataPort: Send + Sync {
    /// Perform one request. Non-2xx statuses are returned as `Ok`.
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}
