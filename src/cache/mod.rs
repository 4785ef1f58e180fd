//! Cache Module
//!
//! Bounded in-memory response store with TTL expiration and LRU eviction.

mod entry;
mod lock;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::{Arc, RwLock};

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use lock::{read_store, write_store};
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;

/// Process-wide store handle shared by the middleware, admin handlers and
/// background tasks.
pub type SharedStore = Arc<RwLock<CacheStore>>;

// == Public Constants ==
/// Default maximum number of cached responses
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Default maximum total body bytes held by the store
pub const DEFAULT_MAX_SIZE_BYTES: usize = 50 * 1024 * 1024; // 50 MB

impl CacheStore {
    /// Wraps the store in the shared handle used across the server.
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }
}
