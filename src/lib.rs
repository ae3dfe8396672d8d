//! Async Cache - a bounded read-through cache with background refresh
//!
//! Serves cached values while they are younger than a max age and reloads
//! them asynchronously as reads come in. Includes an HTTP front end over a
//! simulated origin.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod origin;

pub use api::AppState;
pub use cache::{AsyncCache, BatchResult, CacheSettings, Loader, StatsSnapshot};
pub use config::Config;
pub use error::{CacheError, Result};
pub use origin::SimulatedOrigin;
