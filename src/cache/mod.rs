//! Cache Module
//!
//! In-memory TTL cache with a last-known-good slot, LRU eviction and an
//! injectable clock.

mod clock;
mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use clock::{current_timestamp_ms, system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{validate_key, CacheStore};

/// Cache store shared between handlers and the sweep task.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
