//! TTL Cache - A generic key-value cache abstraction
//!
//! Two interchangeable backends behind one [`Cache`] contract: an in-memory
//! store with TTL expiration and a background sweeper, and an adapter over a
//! remote key-value service.

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod remote;
pub mod tasks;

pub use cache::{Cache, CacheRegistry, CacheStats, MemoryCache, Ttl};
pub use codec::{BincodeCodec, Codec, JsonCodec};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use remote::{RemoteCache, RemoteStore};
