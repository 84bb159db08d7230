//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Ttl ==
/// Lifetime of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ttl {
    /// Never expires
    #[default]
    Permanent,
    /// Expires once this much time has elapsed since the write
    Expires(Duration),
}

impl Ttl {
    /// Returns the duration, or None for permanent entries.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Ttl::Permanent => None,
            Ttl::Expires(ttl) => Some(*ttl),
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, Ttl::Permanent)
    }
}

impl From<Duration> for Ttl {
    fn from(ttl: Duration) -> Self {
        Ttl::Expires(ttl)
    }
}

// == Cache Entry ==
/// Represents a single cache entry with encoded payload and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The encoded value
    pub payload: Vec<u8>,
    /// Write timestamp (monotonic)
    pub created_at: Instant,
    /// Lifetime measured from `created_at`
    pub ttl: Ttl,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current instant.
    pub fn new(payload: Vec<u8>, ttl: Ttl) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry expires once the elapsed time is strictly greater than its
    /// TTL. Permanent entries never expire.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.ttl {
            Ttl::Permanent => false,
            Ttl::Expires(ttl) => now.saturating_duration_since(self.created_at) > ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime as of `now`.
    ///
    /// # Returns
    /// - `Ttl::Permanent` if the entry never expires
    /// - `Ttl::Expires(remaining)`, saturating at zero once elapsed
    pub fn remaining_at(&self, now: Instant) -> Ttl {
        match self.ttl {
            Ttl::Permanent => Ttl::Permanent,
            Ttl::Expires(ttl) => {
                let elapsed = now.saturating_duration_since(self.created_at);
                Ttl::Expires(ttl.saturating_sub(elapsed))
            }
        }
    }
}
