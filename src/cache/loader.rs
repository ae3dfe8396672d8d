//! Loader Module
//!
//! The source-of-truth abstraction the cache reads through.

use std::future::Future;

use async_trait::async_trait;

/// Produces the authoritative value for a key.
///
/// The cache calls this on a miss, after expiry and from background
/// refreshes. Latency, timeouts and retries are the loader's business.
///
/// Any `Fn(String) -> Future<Output = anyhow::Result<V>>` closure is a loader:
///
/// ```ignore
/// let cache = AsyncCache::new(1000, max_age, interval, |key: String| async move {
///     fetch_profile(&key).await
/// });
/// ```
#[async_trait]
pub trait Loader<V>: Send + Sync {
    /// Loads the value for `key`.
    async fn load(&self, key: &str) -> anyhow::Result<V>;
}

#[async_trait]
impl<V, F, Fut> Loader<V> for F
where
    V: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
{
    async fn load(&self, key: &str) -> anyhow::Result<V> {
        (self)(key.to_string()).await
    }
}
