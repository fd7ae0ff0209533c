//! Watchlist Store
//!
//! In-memory collection of tracked IPO entries keyed by identifier.
//! Nothing is persisted; the store starts empty with every process.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A tracked entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Identifier, usually the ticker symbol.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Starred by the user.
    pub favorite: bool,
    /// When the entry was added.
    pub added_at: DateTime<Utc>,
}

/// Thread-safe watchlist preserving insertion order.
#[derive(Debug, Default)]
pub struct WatchlistStore {
    items: RwLock<Vec<WatchlistItem>>,
}

impl WatchlistStore {
    /// Create an empty watchlist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Returns `false` without changes if `id` is already present.
    pub fn add(&self, id: impl Into<String>, name: impl Into<String>) -> bool {
        let id = id.into();
        let mut items = self.items.write();
        if items.iter().any(|item| item.id == id) {
            return false;
        }
        items.push(WatchlistItem {
            id,
            name: name.into(),
            favorite: false,
            added_at: Utc::now(),
        });
        true
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut items = self.items.write();
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    /// Flip the favorite flag, returning the new value, or `None` if absent.
    pub fn toggle_favorite(&self, id: &str) -> Option<bool> {
        self.items
            .write()
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| {
                item.favorite = !item.favorite;
                item.favorite
            })
    }

    /// Whether `id` is on the watchlist.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.read().iter().any(|item| item.id == id)
    }

    /// Look up a single entry.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<WatchlistItem> {
        self.items.read().iter().find(|item| item.id == id).cloned()
    }

    /// Snapshot of all entries in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<WatchlistItem> {
        self.items.read().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Whether the watchlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let store = WatchlistStore::new();
        assert!(store.add("RDDT", "Reddit"));
        assert!(!store.add("RDDT", "Reddit Inc"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("RDDT").unwrap().name, "Reddit");
    }

    #[test]
    fn remove_reports_presence() {
        let store = WatchlistStore::new();
        store.add("ARM", "Arm Holdings");
        assert!(store.remove("ARM"));
        assert!(!store.remove("ARM"));
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_flips_each_time() {
        let store = WatchlistStore::new();
        store.add("CART", "Instacart");
        assert_eq!(store.toggle_favorite("CART"), Some(true));
        assert_eq!(store.toggle_favorite("CART"), Some(false));
        assert_eq!(store.toggle_favorite("NOPE"), None);
    }

    #[test]
    fn ids_are_case_sensitive() {
        let store = WatchlistStore::new();
        store.add("arm", "lowercase");
        assert!(store.contains("arm"));
        assert!(!store.contains("ARM"));
    }

    #[test]
    fn items_keep_insertion_order() {
        let store = WatchlistStore::new();
        store.add("B", "second alphabetically");
        store.add("A", "first alphabetically");
        let ids: Vec<String> = store.items().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }
}
