//! Cache Module
//!
//! Bounded read-through caching with staleness tracking and asynchronous refresh.

mod batch;
mod engine;
mod entry;
mod loader;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use batch::BatchResult;
pub use engine::{AsyncCache, CacheSettings, DEFAULT_CAPACITY};
pub use entry::CacheEntry;
pub use loader::Loader;
pub use lru::LruTracker;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::BoundedStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
