//! Cache configuration.
//!
//! Controls the response cache and the template cache via `mediashelf.toml`.

use serde::Deserialize;

use crate::config::{CacheBackend, CacheSettings};

use super::keys::CacheKey;

// Default values for cache configuration
const DEFAULT_RESPONSE_TTL_SECS: u64 = 5;
const DEFAULT_TEMPLATE_TTL_SECS: u64 = 300;
const DEFAULT_VERSION: &str = "v1";

/// Cache configuration from `mediashelf.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Serve and store rendered responses.
    pub enabled: bool,
    /// Freshness window of a stored response, in seconds.
    pub response_ttl_secs: u64,
    /// Freshness window of a memoized template, in seconds.
    pub template_ttl_secs: u64,
    /// Tag prefixed to every response key.
    pub version: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            response_ttl_secs: DEFAULT_RESPONSE_TTL_SECS,
            template_ttl_secs: DEFAULT_TEMPLATE_TTL_SECS,
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            enabled: settings.backend != CacheBackend::Disabled,
            response_ttl_secs: settings.response_ttl_seconds,
            template_ttl_secs: settings.template_ttl_seconds,
            version: settings.version.clone(),
        }
    }
}

impl CacheConfig {
    /// Store key for `key` under the current version tag.
    pub fn versioned_key(&self, key: &CacheKey) -> String {
        key.versioned(&self.version)
    }
}
