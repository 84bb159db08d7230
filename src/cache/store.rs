//! Entry Store Module
//!
//! Concurrent key to entry map. Readers share the lock; writers, lazy
//! expiry and the sweeper take it exclusively.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::cache::{CacheEntry, CacheStats, StatsCounters};

// == Entry Store ==
/// Key to entry storage shared between a memory cache and its sweeper.
#[derive(Debug, Default)]
pub struct EntryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Performance statistics
    stats: StatsCounters,
}

impl EntryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Put ==
    /// Inserts or fully replaces the entry for `key`.
    pub fn put(&self, key: String, entry: CacheEntry) {
        self.entries.write().insert(key, entry);
    }

    // == With Entry ==
    /// Runs `f` against the entry for `key` under the shared lock.
    ///
    /// Returns None if the key is absent. The payload is borrowed, not copied.
    pub fn with_entry<R>(&self, key: &str, f: impl FnOnce(&CacheEntry) -> R) -> Option<R> {
        self.entries.read().get(key).map(f)
    }

    // == Delete ==
    /// Removes every listed key. Absent keys are ignored.
    pub fn delete<K: AsRef<str>>(&self, keys: &[K]) {
        if keys.is_empty() {
            return;
        }
        let mut entries = self.entries.write();
        for key in keys {
            entries.remove(key.as_ref());
        }
    }

    // == Remove If ==
    /// Removes `key` only if its current entry still matches `predicate`.
    ///
    /// The predicate is re-evaluated under the exclusive lock, so an entry
    /// replaced after the caller's read is left alone.
    pub fn remove_if(&self, key: &str, predicate: impl FnOnce(&CacheEntry) -> bool) -> bool {
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if predicate(entry) => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }

    // == Scan And Remove ==
    /// Removes all entries matching `predicate` in one exclusive pass.
    ///
    /// Returns the number of entries removed.
    pub fn scan_and_remove(&self, mut predicate: impl FnMut(&CacheEntry) -> bool) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !predicate(entry));
        before - entries.len()
    }

    // == Barrier ==
    /// Acquires and releases the exclusive lock.
    ///
    /// Any exclusive operation in flight when this is called has finished
    /// by the time it returns.
    pub fn barrier(&self) {
        drop(self.entries.write());
    }

    pub fn counters(&self) -> &StatsCounters {
        &self.stats
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the current number of entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
