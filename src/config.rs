//! Configuration Module
//!
//! Handles loading and validating cache configuration from environment variables.

use std::env;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of live entries the cache can hold
    pub capacity: usize,
    /// Default TTL in seconds used by callers that insert with a relative TTL
    pub default_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum live entries (default: 1000, must be >= 0)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// `CACHE_CAPACITY` is parsed as a signed integer so that a negative value is
    /// reported instead of being silently replaced by the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let capacity = match lookup("CACHE_CAPACITY") {
            Some(raw) => parse_capacity(&raw)?,
            None => defaults.capacity,
        };

        let default_ttl = lookup("DEFAULT_TTL")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.default_ttl);

        Ok(Self {
            capacity,
            default_ttl,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl: 300,
        }
    }
}

/// Converts a signed capacity into a usable one.
///
/// Zero is accepted; the resulting cache rejects every insert.
pub fn validate_capacity(capacity: i64) -> Result<usize> {
    usize::try_from(capacity).map_err(|_| {
        CacheError::InvalidConfiguration(format!(
            "capacity must not be negative, got {}",
            capacity
        ))
    })
}

fn parse_capacity(raw: &str) -> Result<usize> {
    let parsed: i64 = raw.trim().parse().map_err(|_| {
        CacheError::InvalidConfiguration(format!("CACHE_CAPACITY is not an integer: {:?}", raw))
    })?;
    validate_capacity(parsed)
}
