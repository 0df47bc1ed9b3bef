//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction and lazy TTL expiration.

mod clock;
mod entry;
mod expiry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use entry::CacheEntry;
pub use expiry::ExpirationIndex;
pub use lru::{RecencyList, Slot};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::TtlCache;
