//! Cache Store Module
//!
//! Main cache engine combining a key index with LRU recency tracking and
//! bucketed TTL expiration. Expired entries are purged lazily at the start of
//! every public operation rather than by a background timer.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration};
use tracing::{debug, trace};

use crate::cache::{
    CacheEntry, CacheStats, Clock, ExpirationIndex, RecencyList, Slot, SystemClock, Timestamp,
};
use crate::config::{validate_capacity, Config};
use crate::error::{CacheError, Result};

// == TTL Cache ==
/// Bounded key/value store with LRU eviction and absolute per-entry expiration.
///
/// Every live key has exactly one node in the recency list, one slot in an
/// expiration bucket and one key index entry. All three are updated together
/// inside each `&mut self` call.
#[derive(Debug)]
pub struct TtlCache<K, V, C = SystemClock> {
    /// Key to recency node
    index: HashMap<K, Slot>,
    /// Access order, front is the eviction candidate
    recency: RecencyList<K, V>,
    /// Expiration buckets
    expiry: ExpirationIndex,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of live entries
    capacity: usize,
    clock: C,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` live entries, using the wall clock.
    ///
    /// A capacity of zero is accepted; every `put` on such a cache fails with
    /// [`CacheError::CapacityExhausted`].
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, SystemClock)
    }

    /// Creates a cache from a signed capacity, rejecting negative values.
    pub fn try_new(capacity: i64) -> Result<Self> {
        Ok(Self::new(validate_capacity(capacity)?))
    }

    /// Creates a cache sized by the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.capacity)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Hash + Eq + Clone,
    C: Clock,
{
    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(capacity: usize, clock: C) -> Self {
        Self {
            index: HashMap::new(),
            recency: RecencyList::new(),
            expiry: ExpirationIndex::new(),
            stats: CacheStats::new(),
            capacity,
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Reading does not extend the entry's lifetime.
    pub fn get(&mut self, key: &K) -> Result<&V> {
        let now = self.clock.now();
        self.sweep(now);

        match self.index.get(key) {
            Some(&slot) => {
                self.stats.record_hit();
                self.recency.touch(slot);
                Ok(&self.recency.get(slot).value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::KeyNotFound)
            }
        }
    }

    // == Put ==
    /// Stores `value` under `key` until `expires_at`.
    ///
    /// - A deadline at or before the current time makes the call a no-op.
    /// - Updating a live key moves it to its new expiration bucket and to the
    ///   most recently used position without evicting anything.
    /// - Inserting a new key into a full cache evicts the least recently used entry.
    pub fn put(&mut self, key: K, value: V, expires_at: Timestamp) -> Result<()> {
        let now = self.clock.now();
        self.sweep(now);

        if expires_at <= now {
            trace!(%expires_at, %now, "ignoring put with a deadline that has already passed");
            return Ok(());
        }

        if self.capacity == 0 {
            return Err(CacheError::CapacityExhausted);
        }

        if let Some(&slot) = self.index.get(&key) {
            let entry = self.recency.get_mut(slot);
            let previous = std::mem::replace(&mut entry.expires_at, expires_at);
            entry.value = value;

            self.expiry.remove(previous, slot);
            self.expiry.insert(expires_at, slot);
            self.recency.touch(slot);
            return Ok(());
        }

        if self.index.len() >= self.capacity {
            self.evict_oldest();
        }

        let slot = self
            .recency
            .push_back(CacheEntry::new(key.clone(), value, expires_at));
        self.expiry.insert(expires_at, slot);
        self.index.insert(key, slot);
        self.stats.set_total_entries(self.index.len());

        Ok(())
    }

    // == Put With TTL ==
    /// Stores `value` under `key` for `ttl` from now.
    ///
    /// A TTL too large to represent saturates to the latest representable time.
    /// A zero TTL is a no-op, like any deadline that is not in the future.
    pub fn put_with_ttl(&mut self, key: K, value: V, ttl: StdDuration) -> Result<()> {
        let expires_at = deadline_after(self.clock.now(), ttl);
        self.put(key, value, expires_at)
    }

    // == Remove ==
    /// Removes a live entry and returns its value.
    pub fn remove(&mut self, key: &K) -> Result<V> {
        let now = self.clock.now();
        self.sweep(now);

        let slot = self.index.remove(key).ok_or(CacheError::KeyNotFound)?;
        let entry = self.recency.remove(slot);
        self.expiry.remove(entry.expires_at, slot);
        self.stats.set_total_entries(self.index.len());

        Ok(entry.value)
    }

    // == Time To Live ==
    /// Returns how long a live entry has left. Does not affect recency.
    pub fn ttl_remaining(&mut self, key: &K) -> Result<Duration> {
        let now = self.clock.now();
        self.sweep(now);

        let &slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        Ok(self.recency.get(slot).ttl_remaining(now))
    }

    // == Size ==
    /// Returns the number of live entries, never counting expired ones.
    pub fn size(&mut self) -> usize {
        let now = self.clock.now();
        self.sweep(now);
        self.index.len()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&mut self) -> bool {
        self.size() == 0
    }

    // == Purge Expired ==
    /// Runs the expiration sweep now and returns how many entries it removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        self.sweep(now)
    }

    // == Stats ==
    /// Returns current cache statistics.
    ///
    /// `total_entries` reflects the last operation; it may still include entries
    /// that expired since then.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    /// Maximum number of live entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from least to most recently used, including entries not yet swept.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.recency.iter().map(|entry| &entry.key)
    }

    fn sweep(&mut self, now: Timestamp) -> usize {
        let expired = self.expiry.drain_expired(now);
        if expired.is_empty() {
            return 0;
        }

        for &slot in &expired {
            let entry = self.recency.remove(slot);
            self.index.remove(&entry.key);
        }

        let count = expired.len();
        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.index.len());
        debug!(expired = count, remaining = self.index.len(), "swept expired entries");
        count
    }

    fn evict_oldest(&mut self) {
        if let Some(slot) = self.recency.peek_oldest() {
            let entry = self.recency.remove(slot);
            self.index.remove(&entry.key);
            self.expiry.remove(entry.expires_at, slot);
            self.stats.record_eviction();
            debug!(
                capacity = self.capacity,
                "cache full, evicted least recently used entry"
            );
        }
    }
}

/// Adds a std duration to `now`, saturating at the latest representable time.
fn deadline_after(now: Timestamp, ttl: StdDuration) -> Timestamp {
    Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<chrono::Utc>::MAX_UTC)
}
