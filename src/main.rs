//! ttl_lru demo
//!
//! Exercises the cache against the wall clock: a two-step expiry scenario and a
//! burst of concurrent writers that must respect the capacity bound.

use std::time::Duration;

use anyhow::Context;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru::{CacheError, Config, SharedCache, TtlCache};

/// Number of concurrent writer tasks in the burst phase.
const WRITERS: u64 = 8;
/// Keys written by each writer.
const KEYS_PER_WRITER: u64 = 64;
/// Lifetime of the first entry in the expiry scenario.
const FIRST_TTL: Duration = Duration::from_secs(2);
/// Lifetime of the replacement entry in the expiry scenario.
const SECOND_TTL: Duration = Duration::from_secs(1);
/// Margin slept past each deadline.
const SLEEP_MARGIN: Duration = Duration::from_millis(100);

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Run the expiry scenario on a single-entry cache
/// 4. Run concurrent writers against a cache sized by the configuration
/// 5. Read back a sample of keys, some evicted
/// 6. Print final statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s",
        config.capacity, config.default_ttl
    );

    let (first, second) = expiry_scenario().await?;
    info!("Expiry scenario sizes: {} then {}", first, second);

    let cache = writer_burst(&config).await?;
    read_sample(&cache).await;

    let stats = cache.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

/// Puts one entry, waits past its deadline, then repeats with a shorter TTL.
///
/// Returns the size observed after each deadline.
async fn expiry_scenario() -> anyhow::Result<(usize, usize)> {
    let cache: SharedCache<u64, String> = SharedCache::new(TtlCache::new(1));

    cache.put_with_ttl(1, "a".to_string(), FIRST_TTL).await?;
    tokio::time::sleep(FIRST_TTL + SLEEP_MARGIN).await;
    let first = cache.size().await;

    cache.put_with_ttl(1, "b".to_string(), SECOND_TTL).await?;
    tokio::time::sleep(SECOND_TTL + SLEEP_MARGIN).await;
    let second = cache.size().await;

    Ok((first, second))
}

/// Spawns writers that insert more keys than the cache can hold.
async fn writer_burst(config: &Config) -> anyhow::Result<SharedCache<u64, String>> {
    let cache = SharedCache::from_config(config);
    let ttl = Duration::from_secs(config.default_ttl);

    let mut handles = Vec::with_capacity(WRITERS as usize);
    for writer in 0..WRITERS {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..KEYS_PER_WRITER {
                let key = writer * KEYS_PER_WRITER + i;
                match cache.put_with_ttl(key, format!("value_{}", key), ttl).await {
                    Ok(()) => {}
                    Err(CacheError::CapacityExhausted) => {
                        warn!("cache has zero capacity, writer {} stopping", writer);
                        return;
                    }
                    Err(e) => {
                        warn!("writer {} failed on key {}: {}", writer, key, e);
                        return;
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.await.context("writer task panicked")?;
    }

    let size = cache.size().await;
    info!(
        "Writers finished: size={}, capacity={}",
        size,
        cache.capacity().await
    );
    Ok(cache)
}

/// Reads the first and last key of every writer.
///
/// Early keys have usually been evicted by later ones, so this records both
/// hits and misses.
async fn read_sample(cache: &SharedCache<u64, String>) {
    for writer in 0..WRITERS {
        let first = writer * KEYS_PER_WRITER;
        let last = first + KEYS_PER_WRITER - 1;
        for key in [first, last] {
            match cache.get(&key).await {
                Ok(value) => debug!("key {} -> {}", key, value),
                Err(e) => debug!("key {}: {}", key, e),
            }
        }
    }
}
