//! Simulated Origin
//!
//! A stand-in for a slow remote data source, used by the server binary and tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use tracing::debug;

use crate::cache::Loader;

// == Simulated Origin ==
/// Answers every key after a fixed delay.
///
/// Keys starting with `fail_prefix` are rejected, which makes error paths easy
/// to exercise from the HTTP API.
#[derive(Debug, Default)]
pub struct SimulatedOrigin {
    /// Delay applied to every load
    latency: Duration,
    /// Keys with this prefix fail to load
    fail_prefix: Option<String>,
    /// Number of loads served so far, failures included
    loads: AtomicU64,
}

impl SimulatedOrigin {
    /// Creates an origin that answers after `latency`, rejecting keys with `fail_prefix`.
    pub fn new(latency: Duration, fail_prefix: Option<String>) -> Self {
        Self {
            latency,
            fail_prefix,
            loads: AtomicU64::new(0),
        }
    }

    /// Total loads attempted against this origin.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    fn rejects(&self, key: &str) -> bool {
        self.fail_prefix
            .as_deref()
            .is_some_and(|prefix| !prefix.is_empty() && key.starts_with(prefix))
    }
}

#[async_trait]
impl Loader<String> for SimulatedOrigin {
    async fn load(&self, key: &str) -> anyhow::Result<String> {
        let sequence = self.loads.fetch_add(1, Ordering::Relaxed) + 1;
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.rejects(key) {
            bail!("origin has no value for key '{key}'");
        }

        debug!(key, sequence, "origin served key");
        Ok(format!(
            "{key}:{sequence}@{}",
            chrono::Utc::now().format("%H:%M:%S%.3f")
        ))
    }
}
