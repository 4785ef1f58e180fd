//! Response Cache Middleware
//!
//! Intercepts GET requests, replays stored responses on a hit and captures
//! cacheable responses on a miss.

mod cache_control;
mod capture;
mod key;
mod layer;
mod options;

pub use cache_control::CacheControl;
pub use capture::{CaptureBody, PendingEntry};
pub use key::default_key;
pub use layer::{response_cache, ResponseCache};
pub use options::{CacheOptions, CallerIdentity, KeyGenerator};

/// Marker header set on every cache-eligible response
pub const X_CACHE: &str = "x-cache";

/// Hit counter of the served entry, set on hits only
pub const X_CACHE_HITS: &str = "x-cache-hits";

/// Default TTL in seconds for cached responses
pub const DEFAULT_TTL_SECONDS: u64 = 300;

/// Response headers that are never stored
pub const DEFAULT_EXCLUDED_HEADERS: &[&str] = &["set-cookie", "authorization"];
