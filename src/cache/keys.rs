//! Cache key definitions.
//!
//! A key is `<scope>:<url>`; the store sees it as `<version>:<scope>:<url>`.
//! Reads and writes of the same resource must build the key the same way.

use std::fmt;

use sha2::{Digest, Sha256};

/// Logical response key, before versioning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build a key from a route scope and the full request URL.
    ///
    /// The URL keeps its query string so filtered and paged listings never
    /// share an entry.
    pub fn new(scope: &str, url: &str) -> Self {
        Self(format!("{scope}:{url}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix the key with a version tag.
    pub fn versioned(&self, version: &str) -> String {
        format!("{version}:{}", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Hash Utilities
// ============================================================================

/// Hex SHA-256 of a store key, usable as a file name.
pub fn digest_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
