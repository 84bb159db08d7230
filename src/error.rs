//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

use crate::codec::CodecError;

/// Boxed error returned by remote store clients.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

// == Cache Error Enum ==
/// Unified error type shared by every cache backend.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent or logically expired
    #[error("cache not found: {0}")]
    NotFound(String),

    /// Value could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] CodecError),

    /// Remote store client failure
    #[error("remote store error: {0}")]
    Remote(#[source] RemoteError),

    /// Remote operation exceeded its deadline
    #[error("remote operation timed out after {0:?}")]
    Timeout(Duration),
}

impl CacheError {
    /// Returns true for the not-found kind, whichever backend produced it.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
