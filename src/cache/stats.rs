//! Cache Statistics Module
//!
//! Lifetime counters for the store and the snapshot handed to operators.

use serde::Serialize;

// == Cache Counters ==
/// Tracks cache activity over the store's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheCounters {
    /// Number of successful reads
    pub hits: u64,
    /// Number of reads that found nothing live
    pub misses: u64,
    /// Number of entries evicted to make room
    pub evictions: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
}

impl CacheCounters {
    // == Constructor ==
    /// Creates a new set of counters, all at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}

// == Cache Stats ==
/// Point-in-time view of the store.
///
/// `oldest_entry` / `newest_entry` are creation timestamps (Unix ms) picked by
/// entry age, not by recency order.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub size_bytes: usize,
    pub max_size_bytes: usize,
    pub max_entries: usize,
    pub counters: CacheCounters,
    pub oldest_entry: Option<u64>,
    pub newest_entry: Option<u64>,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        self.counters.hit_rate()
    }

    pub fn total_hits(&self) -> u64 {
        self.counters.hits
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_new() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
        assert_eq!(counters.expirations, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_all_hits() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        assert_eq!(counters.hit_rate(), 1.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_miss();
        counters.record_miss();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.25);
    }

    #[test]
    fn test_record_eviction_and_expiration() {
        let mut counters = CacheCounters::new();
        counters.record_eviction();
        counters.record_eviction();
        counters.record_expiration();
        assert_eq!(counters.evictions, 2);
        assert_eq!(counters.expirations, 1);
    }

    #[test]
    fn test_stats_delegates_to_counters() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_miss();
        let stats = CacheStats {
            entries: 1,
            size_bytes: 10,
            max_size_bytes: 100,
            max_entries: 5,
            counters,
            oldest_entry: None,
            newest_entry: None,
        };
        assert_eq!(stats.total_hits(), 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }
}
