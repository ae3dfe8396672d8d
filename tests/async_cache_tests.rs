//! Behavioral Tests for the Async Cache
//!
//! Drives the public API with tokio's paused clock so staleness and refresh
//! cadence are deterministic.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_cache::{AsyncCache, CacheError, CacheSettings};
use tokio::time::{sleep, Instant};

const LOAD_LATENCY: Duration = Duration::from_millis(50);

// == Helper Functions ==

/// Remote source stand-in: 50ms per load, counts calls, can be switched to failing.
#[derive(Clone, Default)]
struct Remote {
    calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl Remote {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail_from_now_on(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn cache(&self, max_age: Duration, update_interval: Duration) -> AsyncCache<String> {
        self.cache_with(CacheSettings::new(100, max_age, update_interval))
    }

    fn cache_with(&self, settings: CacheSettings) -> AsyncCache<String> {
        let remote = self.clone();
        AsyncCache::with_settings(settings, move |key: String| {
            let remote = remote.clone();
            async move {
                sleep(LOAD_LATENCY).await;
                let call = remote.calls.fetch_add(1, Ordering::SeqCst) + 1;
                if remote.failing.load(Ordering::SeqCst) || key.starts_with("bad") {
                    anyhow::bail!("remote unavailable for {key}");
                }
                Ok::<_, anyhow::Error>(format!("{key}, counter[{call}]"))
            }
        })
    }
}

// == Single Key Behavior ==

#[tokio::test(start_paused = true)]
async fn test_repeated_fresh_reads_load_once() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(10), Duration::from_secs(1));

    for _ in 0..5 {
        let value = cache.get("example_key").await.unwrap();
        assert_eq!(value, "example_key, counter[1]");
    }

    assert_eq!(remote.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_cadence_under_concurrent_reads() {
    const READERS: usize = 3;
    let window = Duration::from_millis(10_200);
    let interval = Duration::from_secs(1);

    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(3600), interval);
    let end = Instant::now() + window;

    let mut readers = Vec::new();
    for _ in 0..READERS {
        let cache = cache.clone();
        readers.push(tokio::spawn(async move {
            let mut reads = 0usize;
            while Instant::now() < end {
                cache.get("example_key").await.unwrap();
                reads += 1;
                sleep(Duration::from_millis(10)).await;
            }
            reads
        }));
    }

    let mut total_reads = 0;
    for reader in readers {
        total_reads += reader.await.unwrap();
    }
    // Let the last refreshes land
    sleep(Duration::from_secs(1)).await;

    let calls = remote.calls();
    let lower = (window.as_millis() / interval.as_millis()) as usize;
    let upper = (window.as_millis().div_ceil(interval.as_millis()) as usize) * READERS;
    assert!(total_reads > calls);
    assert!(
        calls >= lower && calls <= upper,
        "loader called {calls} times, expected within [{lower}, {upper}]"
    );
}

#[tokio::test(start_paused = true)]
async fn test_expiry_forces_synchronous_reload() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(1), Duration::from_secs(2));

    cache.get("example_key").await.unwrap();
    sleep(Duration::from_secs(1)).await;
    let second = cache.get("example_key").await.unwrap();
    sleep(Duration::from_secs(1)).await;
    let third = cache.get("example_key").await.unwrap();

    assert_eq!(remote.calls(), 3);
    assert_eq!(second, "example_key, counter[2]");
    assert_eq!(third, "example_key, counter[3]");

    let stats = cache.stats().await;
    assert_eq!(stats.expirations, 2);
    assert_eq!(stats.refreshes, 0);
}

#[tokio::test(start_paused = true)]
async fn test_fresh_hit_does_not_wait_for_refresh() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(1));

    cache.get("k").await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let start = Instant::now();
    let value = cache.get("k").await.unwrap();
    assert_eq!(start.elapsed(), Duration::ZERO);
    assert_eq!(value, "k, counter[1]");

    sleep(LOAD_LATENCY * 2).await;
    assert_eq!(cache.get("k").await.unwrap(), "k, counter[2]");
    assert_eq!(cache.stats().await.refreshes, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failed_refresh_keeps_serving_until_max_age() {
    let remote = Remote::default();
    let settings = CacheSettings::new(10, Duration::from_secs(5), Duration::from_secs(1))
        .with_quiet_on_error(true);
    let cache = remote.cache_with(settings);

    assert_eq!(cache.get("k").await.unwrap(), "k, counter[1]");
    remote.fail_from_now_on();

    sleep(Duration::from_secs(2)).await;
    assert_eq!(cache.get("k").await.unwrap(), "k, counter[1]");
    sleep(LOAD_LATENCY * 2).await;

    // Refresh failed, old value still served
    assert_eq!(cache.get("k").await.unwrap(), "k, counter[1]");
    assert_eq!(cache.stats().await.refresh_failures, 1);

    // Past max age the failure surfaces and nothing stays cached
    sleep(Duration::from_secs(5)).await;
    let err = cache.get("k").await.unwrap_err();
    assert!(matches!(err, CacheError::Load { .. }));
    assert!(cache.is_empty().await);
}

#[tokio::test(start_paused = true)]
async fn test_refresh_after_eviction_is_harmless() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(1));

    cache.get("k").await.unwrap();
    sleep(Duration::from_secs(2)).await;
    cache.get("k").await.unwrap();
    cache.clear_all().await;

    sleep(LOAD_LATENCY * 2).await;
    assert_eq!(cache.stats().await.refreshes, 1);
    assert!(cache.is_empty().await);

    // The refreshed entry is unreachable; a new load happens
    assert_eq!(cache.get("k").await.unwrap(), "k, counter[3]");
}

#[tokio::test(start_paused = true)]
async fn test_clear_all_resets_state() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(60));

    cache.get("a").await.unwrap();
    cache.get("b").await.unwrap();
    cache.clear_all().await;

    cache.get("a").await.unwrap();
    cache.get("b").await.unwrap();

    assert_eq!(remote.calls(), 4);
    assert_eq!(cache.stats().await.hits, 0);
}

#[tokio::test]
async fn test_zero_capacity_uses_default() {
    let remote = Remote::default();
    let cache = remote.cache_with(CacheSettings::new(
        0,
        Duration::from_secs(1),
        Duration::from_secs(1),
    ));

    assert_eq!(cache.settings().capacity, async_cache::cache::DEFAULT_CAPACITY);
}

// == Batch Behavior ==

#[tokio::test(start_paused = true)]
async fn test_mget_returns_every_key() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(1), Duration::from_secs(2));

    let batch = cache.mget(["key1", "key2", "key3"]).await;

    assert!(batch.errors.is_empty());
    assert_eq!(batch.results.len(), 3);
    assert_eq!(remote.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_mget_loads_misses_in_parallel() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(60));
    let keys: Vec<String> = (0..10).map(|i| format!("key{i}")).collect();

    let start = Instant::now();
    let batch = cache.mget(keys).await;

    assert_eq!(batch.results.len(), 10);
    // Ten loads overlapped instead of running back to back
    assert!(start.elapsed() < LOAD_LATENCY * 2);
}

#[tokio::test(start_paused = true)]
async fn test_mget_isolates_single_failure() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(60));

    let batch = cache.mget(["good1", "bad1", "good2", "good3"]).await;

    assert_eq!(batch.results.len(), 3);
    assert_eq!(batch.errors.len(), 1);
    assert!(matches!(batch.errors["bad1"], CacheError::Load { .. }));
    assert!(!batch.results.contains_key("bad1"));
    assert_eq!(cache.len().await, 3);
}

#[tokio::test(start_paused = true)]
async fn test_mget_fast_path_skips_refresh() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(60), Duration::from_secs(1));

    cache.get("k").await.unwrap();
    sleep(Duration::from_secs(2)).await;

    let batch = cache.mget(["k"]).await;
    assert_eq!(batch.results["k"], "k, counter[1]");
    sleep(LOAD_LATENCY * 2).await;
    assert_eq!(remote.calls(), 1);

    // A single-key read in the same state does refresh
    cache.get("k").await.unwrap();
    sleep(LOAD_LATENCY * 2).await;
    assert_eq!(remote.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_mget_reloads_expired_entries() {
    let remote = Remote::default();
    let cache = remote.cache(Duration::from_secs(1), Duration::from_secs(10));

    cache.mget(["a", "b"]).await;
    sleep(Duration::from_secs(2)).await;

    let batch = cache.mget(["a", "b"]).await;

    assert_eq!(batch.results.len(), 2);
    assert_ne!(batch.results["a"], "a, counter[1]");
    assert_ne!(batch.results["a"], "a, counter[2]");
    assert_eq!(remote.calls(), 4);
    assert_eq!(cache.stats().await.expirations, 2);
}
