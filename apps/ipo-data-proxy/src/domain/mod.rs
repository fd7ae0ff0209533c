//! Domain Layer - Core caching, listing and watchlist logic.
//!
//! Pure types with no I/O. Async and HTTP concerns live in the
//! application and infrastructure layers.

/// Time-based response cache keyed by endpoint and symbol.
pub mod cache;

/// IPO calendar entries and the filter/sort query over them.
pub mod listing;

/// In-memory watchlist.
pub mod watchlist;
