//! Cache Store Module
//!
//! Bounded response store: LRU recency order, entry-count and byte-size limits,
//! lazy TTL expiry.

use lru::LruCache;
use regex::Regex;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheCounters, CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Response store bounded by entry count and total body bytes.
///
/// Recency lives entirely in the container order of the inner `LruCache`:
/// every `get` hit and every `set` moves the key to the most-recently-used end.
#[derive(Debug)]
pub struct CacheStore {
    /// Entries in recency order
    entries: LruCache<String, CacheEntry>,
    /// Lifetime counters
    counters: CacheCounters,
    /// Sum of `size_bytes` over all stored entries
    size_bytes: usize,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Maximum total body bytes allowed
    max_size_bytes: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. Bounds are fixed for the store's lifetime.
    pub fn new(max_entries: usize, max_size_bytes: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            counters: CacheCounters::new(),
            size_bytes: 0,
            max_entries,
            max_size_bytes,
        }
    }

    // == Get ==
    /// Looks up a live entry, promoting it to most-recently-used.
    ///
    /// Expired entries are removed on the spot and count as both an
    /// expiration and a miss.
    pub fn get(&mut self, key: &str) -> Option<CacheEntry> {
        self.get_at(key, current_timestamp_ms())
    }

    /// Same as [`CacheStore::get`] with an explicit clock reading.
    pub fn get_at(&mut self, key: &str, now_ms: u64) -> Option<CacheEntry> {
        let expired = match self.entries.peek(key) {
            Some(entry) => entry.is_expired_at(now_ms),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if expired {
            self.remove(key);
            self.counters.record_expiration();
            self.counters.record_miss();
            debug!(key, "expired entry dropped on read");
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.hit_count += 1;
        self.counters.record_hit();
        Some(entry.clone())
    }

    // == Set ==
    /// Stores an entry under `key`, evicting least-recently-used entries until
    /// both bounds hold.
    ///
    /// Returns the number of entries evicted. An entry larger than the whole
    /// byte budget is admitted and then evicted straight away.
    pub fn set(&mut self, key: String, mut entry: CacheEntry) -> usize {
        self.remove(&key);

        let mut evicted = 0;
        while !self.entries.is_empty()
            && (self.entries.len() >= self.max_entries
                || self.size_bytes + entry.size_bytes > self.max_size_bytes)
        {
            if self.evict_lru() {
                evicted += 1;
            }
        }

        entry.key = key.clone();
        self.size_bytes += entry.size_bytes;
        self.entries.put(key, entry);

        while self.entries.len() > self.max_entries || self.size_bytes > self.max_size_bytes {
            if !self.evict_lru() {
                break;
            }
            evicted += 1;
        }

        evicted
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key)
    }

    // == Clear Pattern ==
    /// Removes every entry, or only those whose key matches `pattern`.
    ///
    /// Returns the number of entries removed. An invalid regular expression
    /// is reported as [`CacheError::InvalidPattern`] and leaves the store as is.
    pub fn clear_pattern(&mut self, pattern: Option<&str>) -> Result<usize> {
        let Some(pattern) = pattern else {
            let count = self.entries.len();
            self.entries.clear();
            self.size_bytes = 0;
            return Ok(count);
        };

        let regex = Regex::new(pattern).map_err(|e| CacheError::InvalidPattern(e.to_string()))?;
        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| regex.is_match(key))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matching {
            self.remove(key);
        }
        Ok(matching.len())
    }

    // == Purge Expired ==
    /// Removes every expired entry. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(current_timestamp_ms())
    }

    pub fn purge_expired_at(&mut self, now_ms: u64) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now_ms))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
            self.counters.record_expiration();
        }
        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of sizes, bounds and counters.
    pub fn stats(&self) -> CacheStats {
        let created = self.entries.iter().map(|(_, entry)| entry.created_at);
        let (oldest_entry, newest_entry) = created.fold((None, None), |(min, max), ts| {
            (
                Some(min.map_or(ts, |m: u64| m.min(ts))),
                Some(max.map_or(ts, |m: u64| m.max(ts))),
            )
        });

        CacheStats {
            entries: self.entries.len(),
            size_bytes: self.size_bytes,
            max_size_bytes: self.max_size_bytes,
            max_entries: self.max_entries,
            counters: self.counters,
            oldest_entry,
            newest_entry,
        }
    }

    /// Keys ordered from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.entries.iter().rev().map(|(key, _)| key.clone()).collect()
    }

    /// Checks for a key without touching recency or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Running total of stored body bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    fn remove(&mut self, key: &str) -> bool {
        match self.entries.pop(key) {
            Some(old) => {
                self.size_bytes -= old.size_bytes;
                true
            }
            None => false,
        }
    }

    fn evict_lru(&mut self) -> bool {
        match self.entries.pop_lru() {
            Some((key, old)) => {
                self.size_bytes -= old.size_bytes;
                self.counters.record_eviction();
                debug!(key = %key, size = old.size_bytes, "evicted least recently used entry");
                true
            }
            None => false,
        }
    }
}
