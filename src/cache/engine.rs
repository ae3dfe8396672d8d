//! Async Cache Engine
//!
//! Read-through cache that answers from memory while values are younger than
//! the max age and refreshes them in the background as reads come in.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{BoundedStore, CacheEntry, CacheStats, Loader, StatsSnapshot};
use crate::error::{CacheError, Result};

// == Public Constants ==
/// Capacity used when zero is requested
pub const DEFAULT_CAPACITY: usize = 10_000;

// == Cache Settings ==
/// Construction-time parameters of an [`AsyncCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of entries
    pub capacity: usize,
    /// Age at which a value may no longer be served
    pub max_age: Duration,
    /// Minimum spacing between background refreshes of a key
    pub update_interval: Duration,
    /// Suppress warnings for failed background refreshes
    pub quiet_on_error: bool,
}

impl CacheSettings {
    /// Creates settings; a zero capacity becomes [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize, max_age: Duration, update_interval: Duration) -> Self {
        Self {
            capacity,
            max_age,
            update_interval,
            quiet_on_error: false,
        }
        .normalized()
    }

    /// Replaces a zero capacity with [`DEFAULT_CAPACITY`].
    fn normalized(mut self) -> Self {
        if self.capacity == 0 {
            self.capacity = DEFAULT_CAPACITY;
        }
        self
    }

    /// Enable or disable refresh failure logging.
    pub fn with_quiet_on_error(mut self, quiet: bool) -> Self {
        self.quiet_on_error = quiet;
        self
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self::new(
            DEFAULT_CAPACITY,
            Duration::from_secs(300),
            Duration::from_secs(30),
        )
    }
}

// == Async Cache ==
/// Bounded read-through cache with asynchronous refresh.
///
/// * A fresh hit returns immediately. If the last refresh attempt for the key
///   is older than `update_interval`, a detached task reloads it.
/// * A hit older than `max_age` is dropped and reloaded before returning.
/// * A miss calls the loader and caches the value only on success.
///
/// Cloning is cheap; clones share the same store.
pub struct AsyncCache<V> {
    pub(crate) shared: Arc<Shared<V>>,
}

pub(crate) struct Shared<V> {
    pub(crate) store: Mutex<BoundedStore<V>>,
    pub(crate) settings: CacheSettings,
    pub(crate) loader: Arc<dyn Loader<V>>,
    pub(crate) stats: Arc<CacheStats>,
}

impl<V> Clone for AsyncCache<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> AsyncCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache in front of `loader`.
    ///
    /// # Arguments
    /// * `capacity` - Maximum entries, zero selects [`DEFAULT_CAPACITY`]
    /// * `max_age` - Age after which a value is reloaded before being served
    /// * `update_interval` - Minimum time between background refreshes of a key
    /// * `loader` - Source of truth
    pub fn new<L>(capacity: usize, max_age: Duration, update_interval: Duration, loader: L) -> Self
    where
        L: Loader<V> + 'static,
    {
        Self::with_settings(CacheSettings::new(capacity, max_age, update_interval), loader)
    }

    /// Creates a cache from prepared settings.
    pub fn with_settings<L>(settings: CacheSettings, loader: L) -> Self
    where
        L: Loader<V> + 'static,
    {
        let settings = settings.normalized();

        Self {
            shared: Arc::new(Shared {
                store: Mutex::new(BoundedStore::new(settings.capacity)),
                settings,
                loader: Arc::new(loader),
                stats: Arc::new(CacheStats::new()),
            }),
        }
    }

    /// Settings in effect, capacity already defaulted.
    pub fn settings(&self) -> &CacheSettings {
        &self.shared.settings
    }

    // == Get ==
    /// Returns the value for `key`, loading it if needed.
    ///
    /// Never waits for a background refresh. Synchronous latency is at most one
    /// store lookup plus one loader call.
    pub async fn get(&self, key: &str) -> Result<V> {
        let now = Instant::now();

        if let Some(entry) = self.lookup(key, now).await {
            if entry.try_begin_refresh(now, self.shared.settings.update_interval) {
                self.spawn_refresh(key.to_string(), Arc::clone(&entry));
            }
            return Ok(entry.value());
        }

        self.load(key, now).await
    }

    /// Finds a fresh entry, dropping it from the store if it has expired.
    async fn lookup(&self, key: &str, now: Instant) -> Option<Arc<CacheEntry<V>>> {
        let mut store = self.shared.store.lock().await;

        match store.get(key) {
            Some(entry) if entry.is_fresh(now, self.shared.settings.max_age) => {
                self.shared.stats.record_hit();
                Some(entry)
            }
            Some(_) => {
                store.remove(key);
                self.shared.stats.record_expiration();
                self.shared.stats.record_miss();
                debug!(key, "dropped expired entry");
                None
            }
            None => {
                self.shared.stats.record_miss();
                None
            }
        }
    }

    // == Load ==
    /// Calls the loader on the caller's task and caches a successful result.
    ///
    /// The entry's refresh clock starts at `requested_at`, when the read began.
    async fn load(&self, key: &str, requested_at: Instant) -> Result<V> {
        match self.shared.loader.load(key).await {
            Ok(value) => {
                let entry = Arc::new(CacheEntry::with_request_time(
                    value.clone(),
                    Instant::now(),
                    requested_at,
                ));
                self.shared
                    .store
                    .lock()
                    .await
                    .insert(key.to_string(), entry);
                self.shared.stats.record_load();
                debug!(key, "loaded value into cache");
                Ok(value)
            }
            Err(source) => {
                self.shared.stats.record_load_failure();
                Err(CacheError::load(key, source))
            }
        }
    }

    // == Background Refresh ==
    /// Reloads `key` on a detached task and writes the result into `entry`.
    ///
    /// The task holds its own handles to the loader and the entry; evicting or
    /// clearing the entry meanwhile only makes the write unobservable.
    fn spawn_refresh(&self, key: String, entry: Arc<CacheEntry<V>>) {
        let loader = Arc::clone(&self.shared.loader);
        let stats = Arc::clone(&self.shared.stats);
        let quiet = self.shared.settings.quiet_on_error;

        tokio::spawn(async move {
            match loader.load(&key).await {
                Ok(value) => {
                    entry.replace(value, Instant::now());
                    stats.record_refresh();
                    debug!(key = %key, "refreshed cached value");
                }
                Err(err) => {
                    stats.record_refresh_failure();
                    if !quiet {
                        warn!(key = %key, error = %err, "failed to refresh cached value");
                    }
                }
            }
        });
    }

    // == Remove ==
    /// Drops the cached entry for `key`.
    pub async fn remove(&self, key: &str) -> Result<()> {
        match self.shared.store.lock().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    // == Clear All ==
    /// Drops every cached entry. Refreshes already in flight still run.
    pub async fn clear_all(&self) {
        self.shared.store.lock().await.clear();
        debug!("cleared all cached entries");
    }

    /// Number of cached entries.
    pub async fn len(&self) -> usize {
        self.shared.store.lock().await.len()
    }

    /// True when nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.shared.store.lock().await.is_empty()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> StatsSnapshot {
        let (total_entries, capacity, evictions) = {
            let store = self.shared.store.lock().await;
            (store.len(), store.capacity(), store.evictions())
        };
        self.shared.stats.snapshot(total_entries, capacity, evictions)
    }
}
