//! Group Registry Module
//!
//! Hands out one shared [`MemoryCache`] per group name.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::cache::MemoryCache;
use crate::codec::{Codec, JsonCodec};
use crate::config::CacheConfig;
use crate::error::Result;

pub(crate) type Groups<C> = RwLock<HashMap<String, Arc<MemoryCache<C>>>>;

// == Cache Registry ==
/// Registry of named memory caches.
///
/// Cloning the registry yields another handle to the same groups. Callers
/// asking for the same group share one store; different groups never do.
#[derive(Clone)]
pub struct CacheRegistry<C: Codec = JsonCodec> {
    groups: Arc<Groups<C>>,
    codec: C,
    config: CacheConfig,
}

impl CacheRegistry<JsonCodec> {
    /// Creates an empty registry whose caches use JSON encoding.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_codec(JsonCodec, config)
    }
}

impl<C: Codec> CacheRegistry<C> {
    pub fn with_codec(codec: C, config: CacheConfig) -> Self {
        Self {
            groups: Arc::new(RwLock::new(HashMap::new())),
            codec,
            config,
        }
    }

    // == Memory ==
    /// Returns the cache for `group`, creating and registering it on first use.
    ///
    /// Concurrent first requests resolve to a single instance: the slot is
    /// re-checked under the write lock and only the caller that still finds
    /// it empty builds a cache, so no losing instance ever starts a sweeper.
    ///
    /// # Panics
    /// Creating a cache outside a Tokio runtime panics.
    pub fn memory(&self, group: &str) -> Arc<MemoryCache<C>> {
        let existing = self.groups.read().get(group).cloned();
        if let Some(cache) = existing {
            return cache;
        }

        let mut groups = self.groups.write();
        if let Some(cache) = groups.get(group) {
            return Arc::clone(cache);
        }

        let cache = Arc::new(MemoryCache::registered(
            self.codec.clone(),
            &self.config,
            group.to_string(),
            Arc::downgrade(&self.groups),
        ));
        groups.insert(group.to_string(), Arc::clone(&cache));
        info!("Created memory cache for group '{}'", group);

        cache
    }

    pub fn contains(&self, group: &str) -> bool {
        self.groups.read().contains_key(group)
    }

    /// Names of all registered groups, in no particular order.
    pub fn groups(&self) -> Vec<String> {
        self.groups.read().keys().cloned().collect()
    }

    // == Shutdown ==
    /// Closes every registered cache, leaving the registry empty.
    pub fn shutdown(&self) -> Result<()> {
        let caches: Vec<_> = self.groups.read().values().cloned().collect();
        for cache in caches {
            cache.close()?;
        }
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, Ttl};

    fn registry() -> CacheRegistry {
        CacheRegistry::new(CacheConfig {
            sweep_interval_ms: 20,
            ..CacheConfig::default()
        })
    }

    #[tokio::test]
    async fn test_same_group_shares_instance() {
        let registry = registry();

        let first = registry.memory("sessions");
        let second = registry.memory("sessions");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.group(), Some("sessions"));

        first.put("token", "abc", Ttl::Permanent).await.unwrap();
        let token: String = second.get("token").await.unwrap();
        assert_eq!(token, "abc");
    }

    #[tokio::test]
    async fn test_distinct_groups_are_isolated() {
        let registry = registry();

        let g1 = registry.memory("g1");
        let g2 = registry.memory("g2");

        g1.put("key", &1, Ttl::Permanent).await.unwrap();
        assert!(g2.get::<i32>("key").await.unwrap_err().is_not_found());

        let mut names = registry.groups();
        names.sort();
        assert_eq!(names, vec!["g1".to_string(), "g2".to_string()]);
    }

    #[tokio::test]
    async fn test_close_deregisters_and_next_request_rebuilds() {
        let registry = registry();

        let old = registry.memory("jobs");
        old.put("key", &1, Ttl::Permanent).await.unwrap();
        old.close().unwrap();

        assert!(!registry.contains("jobs"));

        let fresh = registry.memory("jobs");
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert!(fresh.get::<i32>("key").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_stale_close_leaves_new_instance_registered() {
        let registry = registry();

        let old = registry.memory("jobs");
        old.close().unwrap();
        let fresh = registry.memory("jobs");

        // Closing the old handle again must not evict its replacement
        old.close().unwrap();
        assert!(registry.contains("jobs"));
        assert!(Arc::ptr_eq(&fresh, &registry.memory("jobs")));
    }

    #[tokio::test]
    async fn test_registry_clones_share_groups() {
        let registry = registry();
        let handle = registry.clone();

        let a = registry.memory("shared");
        let b = handle.memory("shared");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_shutdown_closes_everything() {
        let registry = registry();
        let a = registry.memory("a");
        let b = registry.memory("b");

        registry.shutdown().unwrap();

        assert!(registry.groups().is_empty());
        assert!(a.is_closed());
        assert!(b.is_closed());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_acquisition_yields_one_instance() {
        let registry = registry();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.memory("race") })
            })
            .collect();

        let mut caches = Vec::new();
        for handle in handles {
            caches.push(handle.await.unwrap());
        }

        for cache in &caches {
            assert!(Arc::ptr_eq(cache, &caches[0]));
        }
        assert_eq!(registry.groups(), vec!["race".to_string()]);
    }
}
