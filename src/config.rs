//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Interval in milliseconds between expiry sweeps
    pub sweep_interval_ms: u64,
    /// Deadline in milliseconds for remote operations, 0 = none
    pub remote_timeout_ms: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 500)
    /// - `CACHE_REMOTE_TIMEOUT_MS` - Remote operation deadline in milliseconds (default: 0, disabled)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sweep_interval_ms: env::var("CACHE_SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.sweep_interval_ms),
            remote_timeout_ms: env::var("CACHE_REMOTE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.remote_timeout_ms),
        }
    }

    /// Sweep period as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    /// Remote deadline, or None when disabled.
    pub fn remote_timeout(&self) -> Option<Duration> {
        (self.remote_timeout_ms > 0).then(|| Duration::from_millis(self.remote_timeout_ms))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval_ms: 500,
            remote_timeout_ms: 0,
        }
    }
}
