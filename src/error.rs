//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is absent or its entry has expired
    #[error("Key not found")]
    KeyNotFound,

    /// Insert attempted against a cache configured with zero capacity
    #[error("Capacity exhausted: cache was configured with capacity 0")]
    CapacityExhausted,

    /// Construction or configuration rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
