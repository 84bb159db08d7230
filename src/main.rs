//! TTL Cache - soak runner
//!
//! Drives a group memory cache with concurrent Put/Get/Del cycles and
//! reports its statistics.

use std::env;
use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{Cache, CacheConfig, CacheRegistry, MemoryCache, Ttl};

/// Workload parameters for the soak run.
#[derive(Debug, Clone)]
struct SoakConfig {
    /// Number of concurrent workers
    workers: usize,
    /// Put+Get+Del cycles per worker
    cycles: u64,
    /// Cache group the workers share
    group: String,
}

impl SoakConfig {
    /// # Environment Variables
    /// - `SOAK_WORKERS` - Concurrent workers (default: 4)
    /// - `SOAK_CYCLES` - Cycles per worker (default: 10000)
    /// - `SOAK_GROUP` - Cache group name (default: "soak")
    fn from_env() -> Self {
        Self {
            workers: env::var("SOAK_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
            cycles: env::var("SOAK_CYCLES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            group: env::var("SOAK_GROUP").unwrap_or_else(|_| "soak".to_string()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    let soak = SoakConfig::from_env();
    info!(
        "Configuration loaded: sweep_interval={}ms, workers={}, cycles={}, group={}",
        config.sweep_interval_ms, soak.workers, soak.cycles, soak.group
    );

    let registry = CacheRegistry::new(config);
    let cache = registry.memory(&soak.group);

    let mut workers = JoinSet::new();
    for worker in 0..soak.workers {
        let cache = Arc::clone(&cache);
        let cycles = soak.cycles;
        workers.spawn(run_worker(cache, worker, cycles));
    }

    let interrupted = tokio::select! {
        outcome = drain(&mut workers) => {
            outcome?;
            false
        }
        _ = signal::ctrl_c() => true,
    };

    if interrupted {
        warn!("Received Ctrl+C, aborting soak run");
        workers.abort_all();
    } else {
        ensure!(
            cache.is_empty(),
            "{} entries left behind after all deletes",
            cache.len()
        );
    }

    let stats = cache.stats();
    info!(
        "Cache stats: hits={}, misses={}, lazy_expirations={}, swept={}, entries={}, hit_rate={:.3}",
        stats.hits,
        stats.misses,
        stats.lazy_expirations,
        stats.swept,
        stats.total_entries,
        stats.hit_rate()
    );

    registry.shutdown()?;
    info!("Soak run complete");
    Ok(())
}

async fn drain(workers: &mut JoinSet<Result<u64>>) -> Result<()> {
    let mut total = 0;
    while let Some(joined) = workers.join_next().await {
        total += joined.context("soak worker panicked")??;
    }
    info!("Verified {} round-trips", total);
    Ok(())
}

async fn run_worker(cache: Arc<MemoryCache>, worker: usize, cycles: u64) -> Result<u64> {
    for i in 0..cycles {
        let key = format!("soak-{}-{}", worker, i);

        cache.put(&key, &i, Ttl::Permanent).await?;
        let value: u64 = cache.get(&key).await?;
        ensure!(
            value == i,
            "worker {} read {} for key {}, expected {}",
            worker,
            value,
            key,
            i
        );
        cache.del(&[key.as_str()]).await?;

        if i % 1024 == 0 {
            tokio::task::yield_now().await;
        }
    }
    Ok(cycles)
}
