//! Configuration Module
//!
//! Loads server and cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached entries
    pub capacity: usize,
    /// Seconds after which a cached value must be reloaded before use
    pub max_age: u64,
    /// Seconds between background refreshes of a key
    pub update_interval: u64,
    /// Silence warnings for failed background refreshes
    pub quiet_on_error: bool,
    /// HTTP server port
    pub server_port: u16,
    /// Simulated origin latency in milliseconds
    pub origin_latency_ms: u64,
    /// Keys with this prefix fail to load from the simulated origin
    pub origin_fail_prefix: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 10000)
    /// - `CACHE_MAX_AGE_SECS` - Max age in seconds (default: 300)
    /// - `CACHE_UPDATE_INTERVAL_SECS` - Refresh interval in seconds (default: 30)
    /// - `CACHE_QUIET_ON_ERROR` - `true` to silence refresh failures (default: false)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `ORIGIN_LATENCY_MS` - Simulated origin latency (default: 50)
    /// - `ORIGIN_FAIL_PREFIX` - Key prefix the origin rejects (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            max_age: parse_var("CACHE_MAX_AGE_SECS").unwrap_or(defaults.max_age),
            update_interval: parse_var("CACHE_UPDATE_INTERVAL_SECS")
                .unwrap_or(defaults.update_interval),
            quiet_on_error: parse_var("CACHE_QUIET_ON_ERROR").unwrap_or(defaults.quiet_on_error),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            origin_latency_ms: parse_var("ORIGIN_LATENCY_MS")
                .unwrap_or(defaults.origin_latency_ms),
            origin_fail_prefix: env::var("ORIGIN_FAIL_PREFIX")
                .ok()
                .filter(|prefix| !prefix.is_empty()),
        }
    }

    /// Cache parameters derived from this configuration.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings::new(
            self.capacity,
            Duration::from_secs(self.max_age),
            Duration::from_secs(self.update_interval),
        )
        .with_quiet_on_error(self.quiet_on_error)
    }

    pub fn origin_latency(&self) -> Duration {
        Duration::from_millis(self.origin_latency_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            max_age: 300,
            update_interval: 30,
            quiet_on_error: false,
            server_port: 3000,
            origin_latency_ms: 50,
            origin_fail_prefix: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
