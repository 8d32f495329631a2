//! Blob store contract and the in-process implementation.
//!
//! The store is append/overwrite only: this crate never deletes from it.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

use super::entry::HttpMetadata;

const SOURCE: &str = "cache::store";

#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob store i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("blob metadata is malformed: {0}")]
    Metadata(String),
}

/// Metadata written alongside a blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
    pub http_metadata: HttpMetadata,
    pub custom_metadata: BTreeMap<String, String>,
}

/// A blob as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub http_metadata: HttpMetadata,
    pub custom_metadata: BTreeMap<String, String>,
}

/// Key-value blob storage with HTTP-style metadata.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch a blob; `Ok(None)` when the key was never written.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, BlobStoreError>;

    /// Write a blob, replacing any previous value under `key`.
    async fn put(&self, key: &str, body: Bytes, options: PutOptions)
    -> Result<(), BlobStoreError>;
}

/// Process-lifetime blob store.
///
/// Unbounded; entries are only ever replaced.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored blobs.
    pub fn len(&self) -> usize {
        self.read("len").len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys currently held, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.read("keys")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    // Objects are replaced whole; a poisoned map is still consistent.
    fn read(&self, op: &'static str) -> RwLockReadGuard<'_, HashMap<String, StoredObject>> {
        self.objects.read().unwrap_or_else(|poisoned| {
            log_poisoned(op);
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self, op: &'static str) -> RwLockWriteGuard<'_, HashMap<String, StoredObject>> {
        self.objects.write().unwrap_or_else(|poisoned| {
            log_poisoned(op);
            PoisonError::into_inner(poisoned)
        })
    }
}

fn log_poisoned(op: &'static str) {
    warn!(
        component = SOURCE,
        store = "memory",
        op,
        "blob map lock poisoned by a panicked task; continuing with stored entries"
    );
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, BlobStoreError> {
        Ok(self.read("get").get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        options: PutOptions,
    ) -> Result<(), BlobStoreError> {
        let object = StoredObject {
            body,
            http_metadata: options.http_metadata,
            custom_metadata: options.custom_metadata,
        };
        self.write("put").insert(key.to_string(), object);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use super::*;

    fn options(expires_at: &str) -> PutOptions {
        let mut custom_metadata = BTreeMap::new();
        custom_metadata.insert("expiresAt".to_string(), expires_at.to_string());
        PutOptions {
            http_metadata: HttpMetadata {
                content_type: Some("text/html".to_string()),
                ..Default::default()
            },
            custom_metadata,
        }
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryBlobStore::new();
        assert!(store.get("v1:home:/").await.unwrap().is_none());

        store
            .put("v1:home:/", Bytes::from("Hello"), options("10"))
            .await
            .unwrap();

        let object = store.get("v1:home:/").await.unwrap().expect("stored blob");
        assert_eq!(object.body, Bytes::from("Hello"));
        assert_eq!(object.http_metadata.content_type.as_deref(), Some("text/html"));
        assert_eq!(
            object.custom_metadata.get("expiresAt").map(String::as_str),
            Some("10")
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn put_overwrites_previous_value() {
        let store = MemoryBlobStore::new();
        store
            .put("k", Bytes::from("old"), options("1"))
            .await
            .unwrap();
        store
            .put("k", Bytes::from("new"), options("2"))
            .await
            .unwrap();

        let object = store.get("k").await.unwrap().expect("stored blob");
        assert_eq!(object.body, Bytes::from("new"));
        assert_eq!(store.keys(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn memory_store_recovers_from_poisoned_lock() {
        let store = MemoryBlobStore::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = store
                .objects
                .write()
                .expect("objects lock should be acquired");
            panic!("poison objects lock");
        }));

        store
            .put("k", Bytes::from("value"), PutOptions::default())
            .await
            .unwrap();
        assert!(store.get("k").await.unwrap().is_some());
    }
}
