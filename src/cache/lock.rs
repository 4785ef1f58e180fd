//! Poison-tolerant access to the shared store.
//!
//! Poisoned guards are reclaimed and logged instead of propagated.

use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use super::{CacheStore, SharedStore};

pub fn read_store<'a>(store: &'a SharedStore, op: &'static str) -> RwLockReadGuard<'a, CacheStore> {
    match store.read() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                lock_kind = "rwlock.read",
                result = "poisoned_recovered",
                "Recovered from poisoned cache lock"
            );
            poisoned.into_inner()
        }
    }
}

pub fn write_store<'a>(
    store: &'a SharedStore,
    op: &'static str,
) -> RwLockWriteGuard<'a, CacheStore> {
    match store.write() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                lock_kind = "rwlock.write",
                result = "poisoned_recovered",
                "Recovered from poisoned cache lock"
            );
            poisoned.into_inner()
        }
    }
}
