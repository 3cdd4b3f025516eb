use crate::Result;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Runtime configuration.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names:
///
/// ```
/// # use sheetorm::Config;
/// let config = Config::from_json(r#"{ "cache": { "enabled": true } }"#).unwrap();
/// assert!(config.cache.enabled);
/// assert_eq!(config.cache.ttl_ms, 300_000);
/// assert_eq!(config.pagination.per_page, 20);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub pagination: PaginationConfig,

    /// Log the shape of every executed query at `info` level
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache every read, not only queries that opt in
    pub enabled: bool,

    /// How long a cached table snapshot stays fresh, in milliseconds
    pub ttl_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub per_page: usize,
    pub max_per_page: usize,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl CacheConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_ms: 5 * 60 * 1000,
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            max_per_page: 100,
        }
    }
}
