use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cache::BlobStoreError;

/// Startup and adapter failures outside the request path.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("catalog seed `{}` is invalid: {message}", path.display())]
    CatalogSeed { path: PathBuf, message: String },
    #[error("response cache store unavailable at `{}`", path.display())]
    CacheStore {
        path: PathBuf,
        #[source]
        source: BlobStoreError,
    },
}

impl InfraError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn catalog_seed(path: &Path, message: impl Into<String>) -> Self {
        Self::CatalogSeed {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn cache_store(path: &Path, source: BlobStoreError) -> Self {
        Self::CacheStore {
            path: path.to_path_buf(),
            source,
        }
    }
}
