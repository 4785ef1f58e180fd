//! Property-Based Tests for Cache Module
//!
//! Runs random operation sequences against the store and checks them against
//! a plain `Vec` model of recency order.

use axum::http::HeaderMap;
use bytes::Bytes;
use proptest::prelude::*;

use crate::cache::{CacheEntry, CacheStore};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 8;
const TEST_MAX_BYTES: usize = 256;
const TEST_TTL: u64 = 3600;

// == Strategies ==
/// Small key space so sets overwrite and gets hit often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-f]{1,2}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, size: usize },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => (key_strategy(), 0usize..120).prop_map(|(key, size)| CacheOp::Set { key, size }),
        2 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

fn entry(key: &str, size: usize) -> CacheEntry {
    CacheEntry::new(key, 200, HeaderMap::new(), Bytes::from(vec![b'x'; size]), TEST_TTL)
}

/// Recency-ordered model, least recently used first.
#[derive(Default)]
struct Model {
    order: Vec<(String, usize)>,
}

impl Model {
    fn size(&self) -> usize {
        self.order.iter().map(|(_, s)| s).sum()
    }

    fn remove(&mut self, key: &str) -> Option<(String, usize)> {
        let pos = self.order.iter().position(|(k, _)| k == key)?;
        Some(self.order.remove(pos))
    }

    fn set(&mut self, key: String, size: usize) -> usize {
        self.remove(&key);
        let mut evicted = 0;
        while !self.order.is_empty()
            && (self.order.len() >= TEST_MAX_ENTRIES || self.size() + size > TEST_MAX_BYTES)
        {
            self.order.remove(0);
            evicted += 1;
        }
        self.order.push((key, size));
        while self.order.len() > TEST_MAX_ENTRIES || self.size() > TEST_MAX_BYTES {
            self.order.remove(0);
            evicted += 1;
        }
        evicted
    }

    fn get(&mut self, key: &str) -> bool {
        match self.remove(key) {
            Some(item) => {
                self.order.push(item);
                true
            }
            None => false,
        }
    }

    fn keys(&self) -> Vec<String> {
        self.order.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Eviction always removes the least recently used entry, and both reads
    // and writes count as use.
    #[test]
    fn prop_lru_order_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_BYTES);
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Set { key, size } => {
                    let evicted = store.set(key.clone(), entry(&key, size));
                    prop_assert_eq!(evicted, model.set(key, size));
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key).is_some(), model.get(&key));
                }
                CacheOp::Delete { key } => {
                    prop_assert_eq!(store.delete(&key), model.remove(&key).is_some());
                }
            }
            prop_assert_eq!(store.keys_by_recency(), model.keys());
        }
    }

    // Neither bound is ever exceeded, and the running byte total equals the
    // sum of the stored bodies.
    #[test]
    fn prop_bounds_and_size_accounting(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_BYTES);

        for op in ops {
            match op {
                CacheOp::Set { key, size } => {
                    store.set(key.clone(), entry(&key, size));
                }
                CacheOp::Get { key } => {
                    store.get(&key);
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }

            prop_assert!(store.len() <= TEST_MAX_ENTRIES);
            prop_assert!(store.size_bytes() <= TEST_MAX_BYTES);

            let mut sum = 0;
            for key in store.keys_by_recency() {
                sum += store.get(&key).map(|e| e.size_bytes).unwrap_or(0);
            }
            prop_assert_eq!(store.size_bytes(), sum);
        }
    }

    // Hits, misses and evictions are counted exactly once per event.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_BYTES);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;
        let mut expected_evictions = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, size } => {
                    expected_evictions += store.set(key.clone(), entry(&key, size)) as u64;
                }
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => {
                    store.delete(&key);
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.counters.hits, expected_hits);
        prop_assert_eq!(stats.counters.misses, expected_misses);
        prop_assert_eq!(stats.counters.evictions, expected_evictions);
        prop_assert_eq!(stats.counters.expirations, 0);
        prop_assert_eq!(stats.entries, store.len());
    }

    // Reading an entry n times reports a hit count of n on the n-th read.
    #[test]
    fn prop_hit_count_increments(reads in 1u64..20) {
        let mut store = CacheStore::new(TEST_MAX_ENTRIES, TEST_MAX_BYTES);
        store.set("k".to_string(), entry("k", 4));

        for n in 1..=reads {
            let hit = store.get("k");
            prop_assert_eq!(hit.map(|e| e.hit_count), Some(n));
        }
    }
}
