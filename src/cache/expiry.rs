//! Expiration Index Module
//!
//! Groups live entries into buckets keyed by their exact expiration time so the
//! sweep only visits buckets that are already due.

use std::collections::{BTreeMap, HashSet};

use crate::cache::{Slot, Timestamp};

// == Expiration Index ==
/// Ordered map from expiration time to the entries that share it.
///
/// Buckets are never left empty: removing the last slot drops the bucket.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    buckets: BTreeMap<Timestamp, HashSet<Slot>>,
    len: usize,
}

impl ExpirationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `slot` under `expires_at`.
    pub fn insert(&mut self, expires_at: Timestamp, slot: Slot) {
        if self.buckets.entry(expires_at).or_default().insert(slot) {
            self.len += 1;
        }
    }

    /// Removes `slot` from the bucket for `expires_at`.
    ///
    /// Returns false if the slot was not filed there.
    pub fn remove(&mut self, expires_at: Timestamp, slot: Slot) -> bool {
        let Some(bucket) = self.buckets.get_mut(&expires_at) else {
            return false;
        };
        let removed = bucket.remove(&slot);
        if bucket.is_empty() {
            self.buckets.remove(&expires_at);
        }
        if removed {
            self.len -= 1;
        }
        removed
    }

    // == Drain Expired ==
    /// Removes every bucket whose time is at or before `now` and returns its slots.
    ///
    /// Stops at the first bucket still in the future.
    pub fn drain_expired(&mut self, now: Timestamp) -> Vec<Slot> {
        let mut expired = Vec::new();
        while let Some(bucket) = self.buckets.first_entry() {
            if *bucket.key() > now {
                break;
            }
            expired.extend(bucket.remove());
        }
        self.len -= expired.len();
        expired
    }

    /// Number of slots across all buckets.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct expiration times.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
