//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiration.

use chrono::Duration;

use crate::cache::Timestamp;

// == Cache Entry ==
/// Represents a single cache entry with its key, value and deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    /// The key, kept so an evicted entry can be dropped from the key index
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration time
    pub expires_at: Timestamp,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: K, value: V, expires_at: Timestamp) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Time To Live ==
    /// Returns the time left before expiration, or zero once expired.
    pub fn ttl_remaining(&self, now: Timestamp) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}
