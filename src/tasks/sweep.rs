//! Expiry Sweep Task
//!
//! Reads already drop expired entries lazily; this task reclaims the memory
//! of entries that are never read again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{write_store, SharedStore};

/// Spawns a background task that purges expired entries every
/// `interval_secs` seconds.
///
/// Returns `None` when `interval_secs` is 0 (sweeping disabled). The handle
/// should be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let store = CacheStore::new(1000, 50 * 1024 * 1024).into_shared();
/// let sweep_handle = spawn_sweep_task(store.clone(), 60);
/// // Later, during shutdown:
/// if let Some(handle) = sweep_handle { handle.abort(); }
/// ```
pub fn spawn_sweep_task(store: SharedStore, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Expiry sweep disabled");
        return None;
    }
    let interval = Duration::from_secs(interval_secs);

    Some(tokio::spawn(async move {
        info!(interval_secs, "Starting expiry sweep task");

        let mut ticker = tokio::time::interval(interval);
        // First tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            // Guard must not live across the next await
            let removed = write_store(&store, "sweep").purge_expired();

            if removed > 0 {
                info!(removed, "Expiry sweep removed expired entries");
            } else {
                debug!("Expiry sweep found no expired entries");
            }
        }
    }))
}
