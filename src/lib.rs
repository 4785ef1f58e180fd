//! Response Cache - bounded in-process HTTP response caching for axum
//!
//! Serves repeated GET requests from memory: responses are keyed by request
//! identity, held in an LRU store bounded by entry count and body bytes, and
//! expire lazily after their TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{CacheStore, SharedStore};
pub use config::Config;
pub use error::{CacheError, Result};
pub use middleware::{response_cache, CacheOptions, CallerIdentity, ResponseCache};
pub use tasks::spawn_sweep_task;
