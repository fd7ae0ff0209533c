//! Prometheus Metrics Module
//!
//! Exposes proxy metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Requests**: proxy requests by outcome
//! - **Cache**: hits, misses and stored entry count
//! - **Upstream**: upstream responses by status and their latency
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the health server port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "ipo_proxy_requests_total",
        "Total proxy requests by outcome"
    );
    describe_counter!(
        "ipo_proxy_cache_hits_total",
        "Requests served from the response cache"
    );
    describe_counter!(
        "ipo_proxy_cache_misses_total",
        "Requests that required an upstream call"
    );
    describe_gauge!(
        "ipo_proxy_cache_entries",
        "Number of entries held in the response cache"
    );
    describe_counter!(
        "ipo_proxy_upstream_requests_total",
        "Upstream responses by HTTP status"
    );
    describe_histogram!(
        "ipo_proxy_upstream_latency_seconds",
        "Upstream round-trip time"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Outcome label for a proxy request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Payload returned.
    Success,
    /// Credential missing.
    ConfigError,
    /// Required parameter missing.
    ClientError,
    /// Upstream throttled us.
    RateLimited,
    /// Upstream returned another non-success status.
    UpstreamError,
    /// Transport or decode failure.
    Unexpected,
}

impl RequestOutcome {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ConfigError => "config_error",
            Self::ClientError => "client_error",
            Self::RateLimited => "rate_limited",
            Self::UpstreamError => "upstream_error",
            Self::Unexpected => "unexpected",
        }
    }
}

/// Record a completed proxy request.
pub fn record_request(outcome: RequestOutcome) {
    counter!("ipo_proxy_requests_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record a cache hit.
pub fn record_cache_hit() {
    counter!("ipo_proxy_cache_hits_total").increment(1);
}

/// Record a cache miss.
pub fn record_cache_miss() {
    counter!("ipo_proxy_cache_misses_total").increment(1);
}

/// Update the cache entry gauge.
pub fn set_cache_entries(count: usize) {
    gauge!("ipo_proxy_cache_entries").set(count as f64);
}

/// Record an upstream response and its latency.
pub fn record_upstream_response(status: u16, latency: Duration) {
    counter!("ipo_proxy_upstream_requests_total", "status" => status.to_string()).increment(1);
    histogram!("ipo_proxy_upstream_latency_seconds").record(latency.as_secs_f64());
}

// =============================================================================
// Tests
// =============================================================================
