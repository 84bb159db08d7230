//! Cache Module
//!
//! The [`Cache`] contract plus the in-memory backend: entry storage, TTL
//! expiration and the per-group registry.

mod entry;
mod memory;
mod registry;
mod stats;
mod store;


use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

// Re-export public types
pub use entry::{CacheEntry, Ttl};
pub use memory::MemoryCache;
pub use registry::CacheRegistry;
pub use stats::{CacheStats, StatsCounters};
pub use store::EntryStore;

// == Cache Contract ==
/// Key-value cache shared by every backend.
///
/// Values are encoded on the way in and decoded into the requested type on
/// the way out. A missing or expired key is always reported as
/// [`CacheError::NotFound`](crate::error::CacheError::NotFound).
#[async_trait]
pub trait Cache: Send + Sync {
    /// Stores `value` under `key`, replacing any previous entry.
    async fn put<T>(&self, key: &str, value: &T, ttl: Ttl) -> Result<()>
    where
        T: Serialize + Sync + ?Sized;

    /// Fetches and decodes the value stored under `key`.
    async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Send;

    /// Remaining lifetime of `key`.
    async fn ttl(&self, key: &str) -> Result<Ttl>;

    /// Removes every listed key. Missing keys are not an error.
    async fn del(&self, keys: &[&str]) -> Result<()>;
}
