//! Cache Entry Module
//!
//! Defines the per-key record holding a loaded value and its refresh timestamps.

use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

// == Loaded Snapshot ==
/// A value together with the instant it was produced by the loader.
///
/// Replaced as a whole on refresh so readers never see a value paired with
/// another load's timestamp.
#[derive(Debug, Clone)]
struct Loaded<V> {
    value: V,
    data_time: Instant,
}

// == Cache Entry ==
/// Represents a single cached value and its freshness metadata.
///
/// Entries are shared between the store and any refresh task launched for
/// them. A refresh that completes after the entry was evicted writes into an
/// entry nobody can reach any more, which is harmless.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// Last successfully loaded value
    loaded: RwLock<Loaded<V>>,
    /// When a refresh was last initiated
    request_time: Mutex<Instant>,
}

impl<V: Clone> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry for a value loaded at `now`.
    ///
    /// Both the data time and the request time start at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self::with_request_time(value, now, now)
    }

    /// Creates an entry whose refresh clock started before the load finished.
    pub fn with_request_time(value: V, loaded_at: Instant, requested_at: Instant) -> Self {
        Self {
            loaded: RwLock::new(Loaded {
                value,
                data_time: loaded_at,
            }),
            request_time: Mutex::new(requested_at),
        }
    }

    // == Value ==
    /// Returns a copy of the current value.
    pub fn value(&self) -> V {
        self.loaded.read().value.clone()
    }

    /// Instant of the last successful load.
    pub fn data_time(&self) -> Instant {
        self.loaded.read().data_time
    }

    /// Instant of the last refresh attempt.
    pub fn request_time(&self) -> Instant {
        *self.request_time.lock()
    }

    // == Age ==
    /// Time elapsed between the last successful load and `now`.
    ///
    /// Saturates to zero if `now` predates the load.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.data_time())
    }

    /// Returns true if the entry is younger than `max_age` at `now`.
    pub fn is_fresh(&self, now: Instant, max_age: Duration) -> bool {
        self.age(now) < max_age
    }

    // == Begin Refresh ==
    /// Claims the right to refresh this entry.
    ///
    /// Returns true and moves the request time to `now` when more than
    /// `update_interval` has passed since the previous attempt. Check and
    /// update happen under one lock, so concurrent readers of the same entry
    /// start at most one refresh per interval.
    pub fn try_begin_refresh(&self, now: Instant, update_interval: Duration) -> bool {
        let mut requested = self.request_time.lock();
        if now.saturating_duration_since(*requested) > update_interval {
            *requested = now;
            true
        } else {
            false
        }
    }

    // == Replace ==
    /// Stores a freshly loaded value.
    ///
    /// The data time never moves backwards: a load stamped earlier than the
    /// current one still replaces the value but keeps the newer timestamp.
    pub fn replace(&self, value: V, loaded_at: Instant) {
        let mut loaded = self.loaded.write();
        let data_time = loaded.data_time.max(loaded_at);
        *loaded = Loaded { value, data_time };
    }
}
