//! Batch Retrieval
//!
//! Multi-key lookups that serve fresh entries straight from the store and
//! load everything else concurrently.

use std::collections::HashMap;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::cache::AsyncCache;
use crate::error::CacheError;

// == Batch Result ==
/// Per-key outcome of [`AsyncCache::mget`].
///
/// A key appears in at most one of the two maps.
#[derive(Debug)]
pub struct BatchResult<V> {
    /// Keys that produced a value
    pub results: HashMap<String, V>,
    /// Keys whose load failed
    pub errors: HashMap<String, CacheError>,
}

impl<V> Default for BatchResult<V> {
    fn default() -> Self {
        Self {
            results: HashMap::new(),
            errors: HashMap::new(),
        }
    }
}

impl<V> BatchResult<V> {
    /// Records a success; it supersedes an earlier failure of a duplicate key.
    fn succeed(&mut self, key: String, value: V) {
        self.errors.remove(&key);
        self.results.insert(key, value);
    }

    /// Records a failure unless a duplicate of the key already succeeded.
    fn fail(&mut self, key: String, err: CacheError) {
        if !self.results.contains_key(&key) {
            self.errors.insert(key, err);
        }
    }

    /// Total number of distinct keys answered.
    pub fn len(&self) -> usize {
        self.results.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }
}

impl<V> AsyncCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == MGet ==
    /// Looks up many keys at once.
    ///
    /// Fresh entries are copied out under a single store lock. That pass does
    /// not start background refreshes; only [`AsyncCache::get`] does. Every
    /// other key goes through `get` on its own task, and the call returns once
    /// all of them have finished. One key failing never affects another.
    pub async fn mget<I, K>(&self, keys: I) -> BatchResult<V>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let now = Instant::now();
        let mut batch = BatchResult::default();
        let mut pending = Vec::new();

        {
            let mut store = self.shared.store.lock().await;
            for key in keys {
                let key = key.into();
                match store.get(&key) {
                    Some(entry) if entry.is_fresh(now, self.shared.settings.max_age) => {
                        self.shared.stats.record_hit();
                        let value = entry.value();
                        batch.succeed(key, value);
                    }
                    _ => pending.push(key),
                }
            }
        }

        if pending.is_empty() {
            return batch;
        }

        debug!(
            served = batch.results.len(),
            loading = pending.len(),
            "dispatching batch loads"
        );

        let mut tasks = JoinSet::new();
        let mut keys_by_task = HashMap::with_capacity(pending.len());

        for key in pending {
            let cache = self.clone();
            let task_key = key.clone();
            let handle = tasks.spawn(async move {
                let outcome = cache.get(&task_key).await;
                (task_key, outcome)
            });
            keys_by_task.insert(handle.id(), key);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, Ok(value))) => batch.succeed(key, value),
                Ok((key, Err(err))) => batch.fail(key, err),
                Err(join_err) => {
                    if let Some(key) = keys_by_task.remove(&join_err.id()) {
                        error!(key = %key, error = %join_err, "batch load task failed");
                        let err = CacheError::Internal(format!(
                            "load task for key '{key}' failed: {join_err}"
                        ));
                        batch.fail(key, err);
                    }
                }
            }
        }

        batch
    }
}
