//! Market Data Proxy Service
//!
//! Forwards `(endpoint, symbol)` requests to the upstream provider with the
//! server-side credential attached, serving repeats from the response cache
//! while they are fresh.
//!
//! Concurrent misses on the same key are not de-duplicated: each one calls
//! upstream and the last write wins. The cache lock is never held across
//! the upstream call.

use std::sync::Arc;
use std::time::Instant;

use serde_json::value::RawValue;

use crate::application::ports::{MarketDataPort, UpstreamRequest};
use crate::domain::cache::{CacheKey, Clock, ResponseCache, SystemClock};
use crate::infrastructure::metrics::{self, RequestOutcome};

/// Upstream status that signals throttling.
const RATE_LIMITED_STATUS: u16 = 429;

/// Incoming proxy request, as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyRequest {
    /// Upstream path suffix. Required.
    pub endpoint: Option<String>,
    /// Optional ticker symbol.
    pub symbol: Option<String>,
}

impl ProxyRequest {
    /// Request for an endpoint with an optional symbol.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, symbol: Option<&str>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            symbol: symbol.map(str::to_string),
        }
    }
}

/// Errors terminated at the proxy boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    /// The upstream credential is not configured.
    #[error("API key not configured")]
    MissingCredential,

    /// The `endpoint` parameter was absent or empty.
    #[error("Endpoint parameter is required")]
    MissingEndpoint,

    /// Upstream answered 429.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Upstream answered with another non-success status.
    #[error("Failed to fetch data from upstream (status {status})")]
    Upstream {
        /// Status code returned upstream, passed through to the client.
        status: u16,
    },

    /// Transport failure or malformed upstream body.
    #[error("unexpected proxy failure: {0}")]
    Unexpected(String),
}

impl ProxyError {
    /// HTTP status to answer the client with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredential | Self::Unexpected(_) => 500,
            Self::MissingEndpoint => 400,
            Self::RateLimited => RATE_LIMITED_STATUS,
            Self::Upstream { status } => *status,
        }
    }

    /// Message safe to return to the client.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unexpected(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    const fn outcome(&self) -> RequestOutcome {
        match self {
            Self::MissingCredential => RequestOutcome::ConfigError,
            Self::MissingEndpoint => RequestOutcome::ClientError,
            Self::RateLimited => RequestOutcome::RateLimited,
            Self::Upstream { .. } => RequestOutcome::UpstreamError,
            Self::Unexpected(_) => RequestOutcome::Unexpected,
        }
    }
}

/// Caching proxy in front of the upstream market data provider.
pub struct MarketDataService {
    upstream: Arc<dyn MarketDataPort>,
    api_key: Option<String>,
    cache: ResponseCache,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("cache_entries", &self.cache.len())
            .field("ttl", &self.cache.ttl())
            .finish_non_exhaustive()
    }
}

impl MarketDataService {
    /// Create a service using the system clock.
    #[must_use]
    pub fn new(
        upstream: Arc<dyn MarketDataPort>,
        api_key: Option<String>,
        cache: ResponseCache,
    ) -> Self {
        Self::with_clock(upstream, api_key, cache, Arc::new(SystemClock))
    }

    /// Create a service with an explicit clock.
    #[must_use]
    pub fn with_clock(
        upstream: Arc<dyn MarketDataPort>,
        api_key: Option<String>,
        cache: ResponseCache,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            upstream,
            api_key: api_key.filter(|k| !k.is_empty()),
            cache,
            clock,
        }
    }

    /// Whether an upstream credential is configured.
    #[must_use]
    pub const fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Number of cached entries, fresh or stale.
    #[must_use]
    pub fn cache_entries(&self) -> usize {
        self.cache.len()
    }

    /// Serve a proxy request from cache or upstream.
    pub async fn fetch(&self, request: ProxyRequest) -> Result<Arc<RawValue>, ProxyError> {
        self.fetch_map(request, Ok).await
    }

    /// Serve a proxy request and convert the payload.
    ///
    /// A conversion failure is counted as the request outcome, so callers
    /// that decode the payload report one outcome per request.
    pub async fn fetch_map<T, F>(&self, request: ProxyRequest, convert: F) -> Result<T, ProxyError>
    where
        F: FnOnce(Arc<RawValue>) -> Result<T, ProxyError>,
    {
        let result = self.fetch_inner(request).await.and_then(convert);
        let outcome = match &result {
            Ok(_) => RequestOutcome::Success,
            Err(e) => e.outcome(),
        };
        metrics::record_request(outcome);
        result
    }

    async fn fetch_inner(&self, request: ProxyRequest) -> Result<Arc<RawValue>, ProxyError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("Upstream API key is not configured");
            return Err(ProxyError::MissingCredential);
        };

        let Some(endpoint) = request.endpoint.filter(|e| !e.trim().is_empty()) else {
            tracing::debug!("Rejected proxy request without endpoint");
            return Err(ProxyError::MissingEndpoint);
        };
        let symbol = request.symbol.filter(|s| !s.is_empty());

        let key = CacheKey::new(&endpoint, symbol.as_deref());
        if let Some(payload) = self.cache.get_fresh(&key, self.clock.now()) {
            metrics::record_cache_hit();
            tracing::debug!(key = %key, "Serving cached response");
            return Ok(payload);
        }
        metrics::record_cache_miss();

        let started = Instant::now();
        let response = self
            .upstream
            .fetch(UpstreamRequest {
                endpoint: endpoint.clone(),
                symbol,
                api_key: api_key.to_string(),
            })
            .await
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %endpoint, "Upstream request failed");
                ProxyError::Unexpected(e.to_string())
            })?;
        metrics::record_upstream_response(response.status, started.elapsed());

        if response.status == RATE_LIMITED_STATUS {
            tracing::warn!(endpoint = %endpoint, "Upstream rate limit hit");
            return Err(ProxyError::RateLimited);
        }

        if !response.is_success() {
            tracing::warn!(
                endpoint = %endpoint,
                status = response.status,
                "Upstream returned non-success status"
            );
            return Err(ProxyError::Upstream {
                status: response.status,
            });
        }

        let payload: Arc<RawValue> = serde_json::from_slice::<Box<RawValue>>(&response.body)
            .map_err(|e| {
                tracing::error!(error = %e, endpoint = %endpoint, "Upstream body is not valid JSON");
                ProxyError::Unexpected(e.to_string())
            })?
            .into();

        self.cache
            .insert(key.clone(), Arc::clone(&payload), self.clock.now());
        metrics::set_cache_entries(self.cache.len());
        tracing::debug!(key = %key, "Cached upstream response");

        Ok(payload)
    }
}

// =============================================================================
// Tests
// =============================================================================
