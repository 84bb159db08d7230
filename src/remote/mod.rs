//! Remote Cache Module
//!
//! [`Cache`] backend that delegates storage to a remote key-value service.
//! The adapter holds no state of its own beyond the client; it encodes
//! values, forwards calls, and maps the service's "absent" answer to
//! [`CacheError::NotFound`].

#[cfg(feature = "redis")]
mod redis_store;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::cache::{Cache, Ttl};
use crate::codec::{Codec, JsonCodec};
use crate::error::{CacheError, RemoteError, Result};

// == Remote Store ==
/// Minimal client surface the adapter needs from a remote service.
///
/// `None` from [`fetch`](RemoteStore::fetch) and
/// [`remaining`](RemoteStore::remaining) is the "key not found" signal.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch(&self, key: &str) -> std::result::Result<Option<Vec<u8>>, RemoteError>;

    async fn store(&self, key: &str, payload: Vec<u8>, ttl: Ttl)
        -> std::result::Result<(), RemoteError>;

    async fn remaining(&self, key: &str) -> std::result::Result<Option<Ttl>, RemoteError>;

    async fn remove(&self, keys: &[&str]) -> std::result::Result<(), RemoteError>;
}

// == Remote Cache ==
/// Adapter exposing an already-connected [`RemoteStore`] as a [`Cache`].
pub struct RemoteCache<S, C = JsonCodec> {
    store: S,
    codec: C,
    timeout: Option<Duration>,
}

impl<S: RemoteStore> RemoteCache<S, JsonCodec> {
    pub fn new(store: S) -> Self {
        Self::with_codec(store, JsonCodec)
    }
}

impl<S: RemoteStore, C: Codec> RemoteCache<S, C> {
    pub fn with_codec(store: S, codec: C) -> Self {
        Self {
            store,
            codec,
            timeout: None,
        }
    }

    /// Sets a deadline applied to every remote call. `None` disables it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn call<T, F>(&self, op: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, RemoteError>> + Send,
    {
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, op).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("Remote cache operation exceeded {:?}", limit);
                    return Err(CacheError::Timeout(limit));
                }
            },
            None => op.await,
        };
        outcome.map_err(CacheError::Remote)
    }
}

#[async_trait]
impl<S: RemoteStore, C: Codec> Cache for RemoteCache<S, C> {
    async fn put<T>(&self, key: &str, value: &T, ttl: Ttl) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let payload = self.codec.encode(value)?;
        self.call(self.store.store(key, payload, ttl)).await
    }

    async fn get<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.call(self.store.fetch(key)).await? {
            Some(payload) => Ok(self.codec.decode(&payload)?),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Ttl> {
        self.call(self.store.remaining(key))
            .await?
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    async fn del(&self, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        self.call(self.store.remove(keys)).await
    }
}
