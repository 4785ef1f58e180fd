//! Cache Entry Module
//!
//! Defines a single stored HTTP response together with its TTL metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use bytes::Bytes;

// == Cache Entry ==
/// One stored response.
///
/// Only `hit_count` changes after construction; everything else is fixed at
/// capture time.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key the entry was stored under
    pub key: String,
    /// Raw response body
    pub body: Bytes,
    /// Response headers with the exclusion set already stripped
    pub headers: HeaderMap,
    /// HTTP status recorded at capture time
    pub status: u16,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Effective time-to-live in seconds
    pub ttl_seconds: u64,
    /// Number of successful reads
    pub hit_count: u64,
    /// Byte length of `body`
    pub size_bytes: usize,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// `size_bytes` is always derived from `body`, so the store's size
    /// accounting can trust it.
    pub fn new(
        key: impl Into<String>,
        status: u16,
        headers: HeaderMap,
        body: Bytes,
        ttl_seconds: u64,
    ) -> Self {
        let size_bytes = body.len();
        Self {
            key: key.into(),
            body,
            headers,
            status,
            created_at: current_timestamp_ms(),
            ttl_seconds,
            hit_count: 0,
            size_bytes,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is past its TTL at `now_ms`.
    ///
    /// An entry is live while `now - created_at <= ttl * 1000`, so the exact
    /// boundary millisecond still counts as live.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at) > self.ttl_seconds.saturating_mul(1000)
    }

    /// Age of the entry in milliseconds at `now_ms`.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn entry_with_ttl(ttl_seconds: u64) -> CacheEntry {
        CacheEntry::new("k", 200, HeaderMap::new(), Bytes::from_static(b"{}"), ttl_seconds)
    }

    #[test]
    fn test_entry_size_matches_body() {
        let entry = CacheEntry::new(
            "key",
            200,
            HeaderMap::new(),
            Bytes::from_static(b"hello world"),
            60,
        );

        assert_eq!(entry.size_bytes, 11);
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.status, 200);
    }

    #[test]
    fn test_entry_keeps_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        let entry = CacheEntry::new("key", 200, headers, Bytes::new(), 60);

        assert_eq!(entry.headers["content-type"], "application/json");
        assert_eq!(entry.size_bytes, 0);
    }

    #[test]
    fn test_entry_fresh_is_live() {
        let entry = entry_with_ttl(60);
        assert!(!entry.is_expired_at(current_timestamp_ms()));
    }

    #[test]
    fn test_expiry_just_before_and_after_ttl() {
        let mut entry = entry_with_ttl(10);
        let now = current_timestamp_ms();

        entry.created_at = now - 9_900;
        assert!(!entry.is_expired_at(now));

        entry.created_at = now - 10_100;
        assert!(entry.is_expired_at(now));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let mut entry = entry_with_ttl(1);
        let now = current_timestamp_ms();

        // Exactly at the TTL is still live
        entry.created_at = now - 1_000;
        assert!(!entry.is_expired_at(now));
        assert!(entry.is_expired_at(now + 1));
    }

    #[test]
    fn test_zero_ttl_expires_after_first_millisecond() {
        let entry = entry_with_ttl(0);
        assert!(!entry.is_expired_at(entry.created_at));
        assert!(entry.is_expired_at(entry.created_at + 1));
    }

    #[test]
    fn test_age_ms() {
        let entry = entry_with_ttl(60);
        assert_eq!(entry.age_ms(entry.created_at + 250), 250);
        assert_eq!(entry.age_ms(0), 0);
    }
}
