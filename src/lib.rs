//! ttl_lru - A bounded in-memory key/value cache
//!
//! Combines LRU eviction with absolute per-entry expiration. Expired entries are
//! swept lazily at the start of each operation.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    CacheStats, Clock, ManualClock, SharedCache, SystemClock, Timestamp, TtlCache,
};
pub use config::Config;
pub use error::{CacheError, Result};
