//! Expiry Sweeper
//!
//! Background task that periodically removes expired cache entries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EntryStore;

/// Handle to a running expiry sweep loop.
///
/// The loop sleeps for the configured interval, then takes the store's
/// exclusive lock and removes every expired entry. [`Sweeper::stop`] ends
/// the loop; it is synchronous and safe to call any number of times.
#[derive(Debug)]
pub struct Sweeper {
    store: Arc<EntryStore>,
    stopped: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Sweeper {
    /// Spawns the sweep loop for `store`.
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn start(store: Arc<EntryStore>, interval: Duration) -> Self {
        let stopped = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(sweep_loop(
            Arc::clone(&store),
            Arc::clone(&stopped),
            interval,
        ));

        Self {
            store,
            stopped,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Stops the sweep loop.
    ///
    /// Once this returns, the loop will not remove anything else from the
    /// store, even if a sweep was running on another worker thread.
    pub fn stop(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }

        // A sweep holding the lock right now finishes before we get it;
        // any later sweep sees the flag.
        self.store.barrier();
        info!("Expiry sweeper stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

async fn sweep_loop(store: Arc<EntryStore>, stopped: Arc<AtomicBool>, interval: Duration) {
    info!(
        "Starting expiry sweeper with interval of {} ms",
        interval.as_millis()
    );

    loop {
        tokio::time::sleep(interval).await;

        let now = Instant::now();
        let removed = store.scan_and_remove(|entry| {
            !stopped.load(Ordering::Acquire) && entry.is_expired_at(now)
        });

        if stopped.load(Ordering::Acquire) {
            break;
        }

        store.counters().record_swept(removed);
        if removed > 0 {
            debug!("Expiry sweep: removed {} expired entries", removed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheEntry, Ttl};

    fn store_with(entries: &[(&str, Ttl)]) -> Arc<EntryStore> {
        let store = Arc::new(EntryStore::new());
        for (key, ttl) in entries {
            store.put(key.to_string(), CacheEntry::new(b"value".to_vec(), *ttl));
        }
        store
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let store = store_with(&[("expire_soon", Ttl::Expires(Duration::from_millis(20)))]);

        let sweeper = Sweeper::start(Arc::clone(&store), Duration::from_millis(50));

        // Wait for entry to expire and a sweep to run
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(store.is_empty(), "Expired entry should have been swept");
        assert_eq!(store.stats().swept, 1);

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_valid_entries() {
        let store = store_with(&[
            ("long_lived", Ttl::Expires(Duration::from_secs(3600))),
            ("forever", Ttl::Permanent),
        ]);

        let sweeper = Sweeper::start(Arc::clone(&store), Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.len(), 2, "Live entries should not be removed");

        sweeper.stop();
    }

    #[tokio::test]
    async fn test_stopped_sweeper_no_longer_reclaims() {
        let store = Arc::new(EntryStore::new());
        let sweeper = Sweeper::start(Arc::clone(&store), Duration::from_millis(20));
        sweeper.stop();

        store.put(
            "stale".to_string(),
            CacheEntry::new(b"value".to_vec(), Duration::from_millis(1).into()),
        );
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let store = Arc::new(EntryStore::new());
        let sweeper = Sweeper::start(store, Duration::from_millis(20));

        assert!(!sweeper.is_stopped());
        sweeper.stop();
        sweeper.stop();
        assert!(sweeper.is_stopped());
    }
}
