//! Cache Statistics Module
//!
//! Counts lookups, loads and background refreshes.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Engine counters, updated without locking.
///
/// Shared with background refresh tasks, which report their outcome here.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    expirations: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

impl CacheStats {
    /// Creates a set of zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A lookup served from the store.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A lookup that had to go to the loader, expired entries included.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// An entry dropped because it outlived the max age.
    pub fn record_expiration(&self) {
        self.expirations.fetch_add(1, Ordering::Relaxed);
    }

    /// A synchronous load that produced a value.
    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// A synchronous load the loader rejected.
    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// A background refresh that replaced the value.
    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// A background refresh that failed; the old value stays.
    pub fn record_refresh_failure(&self) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads every counter into a serializable snapshot.
    ///
    /// Store-owned figures are passed in by the caller.
    pub fn snapshot(
        &self,
        total_entries: usize,
        capacity: usize,
        evictions: u64,
    ) -> StatsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };

        StatsSnapshot {
            hits,
            misses,
            expirations: self.expirations.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            refreshes: self.refreshes.load(Ordering::Relaxed),
            refresh_failures: self.refresh_failures.load(Ordering::Relaxed),
            evictions,
            total_entries,
            capacity,
            hit_rate,
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    /// Lookups served from the store
    pub hits: u64,
    /// Lookups that fell through to the loader
    pub misses: u64,
    /// Entries dropped for exceeding the max age
    pub expirations: u64,
    /// Successful synchronous loads
    pub loads: u64,
    /// Failed synchronous loads
    pub load_failures: u64,
    /// Successful background refreshes
    pub refreshes: u64,
    /// Failed background refreshes
    pub refresh_failures: u64,
    /// Entries evicted for capacity
    pub evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot(0, 0, 0), StatsSnapshot::default());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.snapshot(0, 0, 0).hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.snapshot(0, 0, 0).hit_rate, 0.75);
    }

    #[test]
    fn test_counters() {
        let stats = CacheStats::new();
        stats.record_expiration();
        stats.record_load();
        stats.record_load();
        stats.record_load_failure();
        stats.record_refresh();
        stats.record_refresh_failure();
        stats.record_refresh_failure();

        let snapshot = stats.snapshot(7, 10, 3);
        assert_eq!(snapshot.expirations, 1);
        assert_eq!(snapshot.loads, 2);
        assert_eq!(snapshot.load_failures, 1);
        assert_eq!(snapshot.refreshes, 1);
        assert_eq!(snapshot.refresh_failures, 2);
        assert_eq!(snapshot.total_entries, 7);
        assert_eq!(snapshot.capacity, 10);
        assert_eq!(snapshot.evictions, 3);
    }

    #[test]
    fn test_snapshot_serializes() {
        let snapshot = CacheStats::new().snapshot(1, 50, 0);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"total_entries\":1"));
        assert!(json.contains("\"capacity\":50"));
        assert!(json.contains("hit_rate"));
    }
}
