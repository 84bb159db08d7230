//! Memory Cache Module
//!
//! In-process [`Cache`] backend: an [`EntryStore`] swept in the background
//! by a [`Sweeper`], with lazy expiration on every read.

use std::sync::{Arc, Weak};
use std::time::Instant;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::cache::registry::Groups;
use crate::cache::{Cache, CacheEntry, CacheStats, EntryStore, Ttl};
use crate::codec::{Codec, JsonCodec};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::Sweeper;

/// Link back to the registry slot a group cache occupies.
struct Registration<C: Codec> {
    group: String,
    groups: Weak<Groups<C>>,
}

// == Memory Cache ==
/// In-memory cache with TTL expiration.
///
/// Construction starts a background sweeper, so it must happen inside a
/// Tokio runtime. The sweeper stops on [`MemoryCache::close`] or drop.
pub struct MemoryCache<C: Codec = JsonCodec> {
    store: Arc<EntryStore>,
    codec: C,
    sweeper: Sweeper,
    registration: Option<Registration<C>>,
}

impl MemoryCache<JsonCodec> {
    /// Creates a standalone JSON-encoded cache.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_codec(JsonCodec, config)
    }
}

impl<C: Codec> MemoryCache<C> {
    /// Creates a standalone cache using `codec` for values.
    pub fn with_codec(codec: C, config: &CacheConfig) -> Self {
        Self::build(codec, config, None)
    }

    pub(crate) fn registered(
        codec: C,
        config: &CacheConfig,
        group: String,
        groups: Weak<Groups<C>>,
    ) -> Self {
        Self::build(codec, config, Some(Registration { group, groups }))
    }

    fn build(codec: C, config: &CacheConfig, registration: Option<Registration<C>>) -> Self {
        let store = Arc::new(EntryStore::new());
        let sweeper = Sweeper::start(Arc::clone(&store), config.sweep_interval());

        Self {
            store,
            codec,
            sweeper,
            registration,
        }
    }

    // == Close ==
    /// Stops the sweeper and removes this instance from its registry.
    ///
    /// The registry slot is only cleared if it still holds this instance.
    /// Calling close again is a no-op. Reads after close still honour
    /// expiration; only background reclamation stops.
    pub fn close(&self) -> Result<()> {
        self.sweeper.stop();

        let Some(registration) = &self.registration else {
            return Ok(());
        };
        let Some(groups) = registration.groups.upgrade() else {
            return Ok(());
        };

        let removed = {
            let mut groups = groups.write();
            match groups.get(&registration.group) {
                Some(current) if std::ptr::eq(Arc::as_ptr(current), self) => {
                    groups.remove(&registration.group)
                }
                _ => None,
            }
        };

        if removed.is_some() {
            info!("Closed memory cache for group '{}'", registration.group);
        }
        Ok(())
    }

    /// Group name, for registry-issued instances.
    pub fn group(&self) -> Option<&str> {
        self.registration.as_ref().map(|r| r.group.as_str())
    }

    pub fn is_closed(&self) -> bool {
        self.sweeper.is_stopped()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }

    /// Number of stored entries, including expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drops `key` if it is still expired under the exclusive lock.
    fn expire(&self, key: &str) {
        if self.store.remove_if(key, |entry| entry.is_expired()) {
            self.store.counters().record_lazy_expiration();
            debug!("Lazily expired key '{}'", key);
        }
    }
}

#[async_trait]
impl<C: Codec> Cache for MemoryCache<C> {
    async fn put<T>(&self, key: &str, value: &T, ttl: Ttl) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let payload = self.codec.encode(value)?;
        self.store.put(key.to_string(), CacheEntry::new(payload, ttl));
        Ok(())
    }

    async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        let now = Instant::now();
        let lookup = self.store.with_entry(key, |entry| {
            if entry.is_expired_at(now) {
                None
            } else {
                Some(self.codec.decode::<T>(&entry.payload))
            }
        });

        match lookup {
            Some(Some(decoded)) => {
                self.store.counters().record_hit();
                Ok(decoded?)
            }
            Some(None) => {
                self.store.counters().record_miss();
                self.expire(key);
                Err(CacheError::NotFound(key.to_string()))
            }
            None => {
                self.store.counters().record_miss();
                Err(CacheError::NotFound(key.to_string()))
            }
        }
    }

    async fn ttl(&self, key: &str) -> Result<Ttl> {
        let now = Instant::now();
        let lookup = self.store.with_entry(key, |entry| {
            (!entry.is_expired_at(now)).then(|| entry.remaining_at(now))
        });

        match lookup {
            Some(Some(remaining)) => Ok(remaining),
            Some(None) => {
                self.expire(key);
                Err(CacheError::NotFound(key.to_string()))
            }
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    async fn del(&self, keys: &[&str]) -> Result<()> {
        self.store.delete(keys);
        Ok(())
    }
}

impl<C: Codec> Drop for MemoryCache<C> {
    fn drop(&mut self) {
        self.sweeper.stop();
    }
}
