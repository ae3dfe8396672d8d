//! Bounded Store Module
//!
//! Capacity-limited map from keys to shared cache entries with LRU eviction.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, LruTracker};

// == Bounded Store ==
/// Key-to-entry storage that never holds more than `capacity` entries.
///
/// The store knows nothing about freshness; it only keeps entries and evicts
/// the least recently used one when an insert would exceed capacity.
#[derive(Debug)]
pub struct BoundedStore<V> {
    /// Key-entry storage
    entries: HashMap<String, Arc<CacheEntry<V>>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Number of entries evicted for capacity
    evictions: u64,
}

impl<V> BoundedStore<V> {
    // == Constructor ==
    /// Creates an empty store holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one so inserts always succeed.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            capacity: capacity.max(1),
            evictions: 0,
        }
    }

    // == Get ==
    /// Returns the entry for `key` and marks it as recently used.
    pub fn get(&mut self, key: &str) -> Option<Arc<CacheEntry<V>>> {
        let entry = self.entries.get(key).cloned()?;
        self.lru.touch(key);
        Some(entry)
    }

    // == Insert ==
    /// Stores `entry` under `key`, replacing any previous entry.
    ///
    /// Inserting a new key into a full store evicts the least recently used
    /// entry first.
    pub fn insert(&mut self, key: String, entry: Arc<CacheEntry<V>>) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.evictions += 1;
                debug!(key = %evicted, "evicted least recently used entry");
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, entry);
    }

    // == Remove ==
    /// Removes the entry for `key`, returning it if present.
    pub fn remove(&mut self, key: &str) -> Option<Arc<CacheEntry<V>>> {
        let removed = self.entries.remove(key)?;
        self.lru.remove(key);
        Some(removed)
    }

    // == Clear ==
    /// Drops every entry. Eviction count is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries, never below one.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries evicted for capacity since creation.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }
}
