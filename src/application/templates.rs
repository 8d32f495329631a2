//! Template lookup: the source contract and a TTL-bounded in-process cache.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::cache::{Clock, SystemClock};

pub const METRIC_TEMPLATE_CACHE_HIT: &str = "mediashelf_template_cache_hit_total";
pub const METRIC_TEMPLATE_CACHE_MISS: &str = "mediashelf_template_cache_miss_total";

const TEMPLATE_EXTENSION: &str = "html";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template name `{0}`")]
    InvalidName(String),
    #[error("template `{0}` not found")]
    NotFound(String),
    #[error("template `{name}` fetch returned status {status}")]
    Fetch { name: String, status: u16 },
    #[error("template `{name}` could not be read: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("template `{name}` request failed: {message}")]
    Transport { name: String, message: String },
}

/// Map a template name to its file name, rejecting anything path-like.
pub fn template_file_name(name: &str) -> Result<String, TemplateError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(TemplateError::InvalidName(name.to_string()));
    }
    Ok(format!("{name}.{TEMPLATE_EXTENSION}"))
}

/// Where raw template text comes from.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Fetch the raw text of template `name`. Failures are not recovered.
    async fn fetch(&self, name: &str) -> Result<String, TemplateError>;
}

#[derive(Debug, Clone)]
struct TemplateCacheEntry {
    value: Arc<str>,
    expires_at: i64,
}

/// Process-lifetime memo of template text, refreshed after `ttl_secs`.
///
/// Concurrent misses on one name may each fetch; the last insert wins.
pub struct TemplateCache {
    source: Arc<dyn TemplateSource>,
    clock: Arc<dyn Clock>,
    ttl_secs: i64,
    entries: DashMap<String, TemplateCacheEntry>,
}

impl TemplateCache {
    pub fn new(source: Arc<dyn TemplateSource>, ttl_secs: u64) -> Self {
        Self {
            source,
            clock: Arc::new(SystemClock),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
            entries: DashMap::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Return the live text for `name`, fetching it when absent or expired.
    pub async fn load(&self, name: &str) -> Result<Arc<str>, TemplateError> {
        if let Some(entry) = self.entries.get(name)
            && entry.expires_at > self.clock.now()
        {
            counter!(METRIC_TEMPLATE_CACHE_HIT).increment(1);
            return Ok(Arc::clone(&entry.value));
        }

        counter!(METRIC_TEMPLATE_CACHE_MISS).increment(1);
        debug!(cache = "template", outcome = "miss", template = name, "fetching template");

        let value: Arc<str> = Arc::from(self.source.fetch(name).await?);
        let entry = TemplateCacheEntry {
            value: Arc::clone(&value),
            expires_at: self.clock.now().saturating_add(self.ttl_secs),
        };
        self.entries.insert(name.to_string(), entry);
        Ok(value)
    }

    /// Number of memoized templates, live or expired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
