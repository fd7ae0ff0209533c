//! Response Cache
//!
//! Time-based cache for upstream market data responses, keyed by
//! `(endpoint, symbol)`.
//!
//! # Design
//!
//! - One entry per distinct key; a refresh overwrites the old entry
//! - Entries are never removed early, a stale entry simply stops being served
//! - No eviction: the key space is the small set of endpoint/symbol pairs
//!   the frontend actually requests
//!
//! Payloads are stored as the exact JSON text received from upstream, so two
//! hits on the same entry return byte-identical bodies.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::value::RawValue;

/// Default freshness window for cached responses (one hour).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

// =============================================================================
// Clock
// =============================================================================

/// Source of monotonic time for freshness checks.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// =============================================================================
// Cache Key
// =============================================================================

/// Deterministic cache key derived from an endpoint and optional symbol.
///
/// Formatted as `"{endpoint}"` or `"{endpoint}-{symbol}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for an endpoint and optional symbol.
    ///
    /// An empty symbol is treated the same as no symbol.
    #[must_use]
    pub fn new(endpoint: &str, symbol: Option<&str>) -> Self {
        match symbol.filter(|s| !s.is_empty()) {
            Some(symbol) => Self(format!("{endpoint}-{symbol}")),
            None => Self(endpoint.to_string()),
        }
    }

    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Cache Entry
// =============================================================================

/// A cached upstream payload and the instant it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Upstream JSON payload, verbatim.
    pub payload: Arc<RawValue>,
    /// When the payload was fetched.
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// Whether the entry is still within `ttl` at `now`.
    #[must_use]
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

// =============================================================================
// Response Cache
// =============================================================================

/// Shared in-memory response cache.
#[derive(Debug)]
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

impl ResponseCache {
    /// Create an empty cache with the given TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Configured freshness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a payload that is still fresh at `now`.
    #[must_use]
    pub fn get_fresh(&self, key: &CacheKey, now: Instant) -> Option<Arc<RawValue>> {
        self.entries
            .read()
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Store a payload, replacing any previous entry for the key.
    pub fn insert(&self, key: CacheKey, payload: Arc<RawValue>, fetched_at: Instant) {
        self.entries.write().insert(
            key,
            CacheEntry {
                payload,
                fetched_at,
            },
        );
    }

    /// Number of stored entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
