#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::items_after_statements
    )
)]

//! IPO Data Proxy - Cached Market Data Gateway
//!
//! An HTTP service that shields the upstream market data credential and
//! cuts upstream call volume with a short-lived in-memory cache. It also
//! serves a filtered IPO calendar and a process-local watchlist.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types
//!   - `cache`: TTL response cache keyed by endpoint and symbol
//!   - `listing`: IPO calendar entries and filter/sort queries
//!   - `watchlist`: In-memory watchlist store
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Upstream provider interface
//!   - `services`: Cache proxy and IPO calendar services
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `upstream`: `reqwest` client for the provider
//!   - `http`: Public axum API
//!   - `config`: Environment configuration
//!   - `health`: Health check and metrics endpoint
//!
//! # Data Flow
//!
//! ```text
//! client ──► /api/market-data-proxy ──► MarketDataService ──► ResponseCache
//!                                              │ (miss)
//!                                              └──► UpstreamClient ──► provider
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Cache, listing and watchlist types with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::cache::{CacheKey, Clock, DEFAULT_CACHE_TTL, ResponseCache, SystemClock};
pub use domain::listing::{IpoListing, IpoStatus, ListingQuery, PriceRange, SortKey, SortOrder};
pub use domain::watchlist::{WatchlistItem, WatchlistStore};

// Application
pub use application::ports::{MarketDataPort, UpstreamError, UpstreamRequest, UpstreamResponse};
pub use application::services::{
    IPO_CALENDAR_ENDPOINT, IpoCalendarService, MarketDataService, ProxyError, ProxyRequest,
};

// Infrastructure config
pub use infrastructure::config::{
    CacheSettings, ConfigError, Credentials, ProxyConfig, ServerSettings, UpstreamSettings,
};

// HTTP API
pub use infrastructure::http::{ApiError, AppState, ErrorBody, create_router};

// Health server
pub use infrastructure::health::{HealthServer, HealthServerError, HealthServerState};

// Upstream client
pub use infrastructure::upstream::UpstreamClient;

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
