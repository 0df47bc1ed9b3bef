//! Shared Cache Handle
//!
//! Cloneable handle for using one [`TtlCache`] from many tasks.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, Clock, SystemClock, Timestamp, TtlCache};
use crate::config::Config;
use crate::error::Result;

/// Thread-safe cache handle.
///
/// Every operation runs under one lock, so the sweep, the capacity decision and
/// the index updates of a call are never observed half-done. Reads also take
/// the lock exclusively because they reorder the recency list and may sweep.
pub struct SharedCache<K, V, C = SystemClock> {
    inner: Arc<Mutex<TtlCache<K, V, C>>>,
}

impl<K, V, C> Clone for SharedCache<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
{
    /// Creates a shared cache from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(TtlCache::from_config(config))
    }
}

impl<K, V, C> SharedCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Wraps an existing cache.
    pub fn new(cache: TtlCache<K, V, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Retrieves a clone of the value stored under `key`.
    pub async fn get(&self, key: &K) -> Result<V>
    where
        V: Clone,
    {
        let mut cache = self.inner.lock().await;
        cache.get(key).cloned()
    }

    pub async fn put(&self, key: K, value: V, expires_at: Timestamp) -> Result<()> {
        self.inner.lock().await.put(key, value, expires_at)
    }

    pub async fn put_with_ttl(&self, key: K, value: V, ttl: Duration) -> Result<()> {
        self.inner.lock().await.put_with_ttl(key, value, ttl)
    }

    pub async fn remove(&self, key: &K) -> Result<V> {
        self.inner.lock().await.remove(key)
    }

    pub async fn size(&self) -> usize {
        self.inner.lock().await.size()
    }

    pub async fn purge_expired(&self) -> usize {
        self.inner.lock().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.lock().await.capacity()
    }
}
