//! Filesystem-backed blob store.
//!
//! One file per key, named by the SHA-256 of the key. A file holds a single
//! JSON header line (key and metadata), a newline, then the raw body. Writes
//! go to a temporary sibling first and are renamed into place, so readers see
//! either the old blob or the new one.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cache::{BlobStore, BlobStoreError, HttpMetadata, PutOptions, StoredObject, digest_key};

const BLOB_EXTENSION: &str = "blob";

#[derive(Debug, Serialize, Deserialize)]
struct BlobHeader {
    key: String,
    #[serde(default)]
    http: HttpMetadata,
    #[serde(default)]
    custom: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Use `root` as the store directory, creating it when missing.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BlobStoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{BLOB_EXTENSION}", digest_key(key)))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, BlobStoreError> {
        let raw = match tokio::fs::read(self.path_for(key)).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let newline = raw
            .iter()
            .position(|byte| *byte == b'\n')
            .ok_or_else(|| BlobStoreError::Metadata("missing header line".to_string()))?;
        let header: BlobHeader = serde_json::from_slice(&raw[..newline])
            .map_err(|err| BlobStoreError::Metadata(err.to_string()))?;
        if header.key != key {
            return Err(BlobStoreError::Metadata(format!(
                "file holds key `{}`",
                header.key
            )));
        }

        Ok(Some(StoredObject {
            body: Bytes::copy_from_slice(&raw[newline + 1..]),
            http_metadata: header.http,
            custom_metadata: header.custom,
        }))
    }

    async fn put(
        &self,
        key: &str,
        body: Bytes,
        options: PutOptions,
    ) -> Result<(), BlobStoreError> {
        let header = BlobHeader {
            key: key.to_string(),
            http: options.http_metadata,
            custom: options.custom_metadata,
        };
        let mut contents = serde_json::to_vec(&header)
            .map_err(|err| BlobStoreError::Metadata(err.to_string()))?;
        contents.push(b'\n');
        contents.extend_from_slice(&body);

        let target = self.path_for(key);
        let temp = target.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        if let Err(err) = write_then_rename(&temp, &target, &contents).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await
                && cleanup.kind() != io::ErrorKind::NotFound
            {
                debug!(store = "filesystem", key, error = %cleanup, "temp blob left behind");
            }
            return Err(err.into());
        }

        debug!(store = "filesystem", key, bytes = body.len(), "wrote blob");
        Ok(())
    }
}

/// A partial temp file is the caller's to remove.
async fn write_then_rename(temp: &Path, target: &Path, contents: &[u8]) -> io::Result<()> {
    tokio::fs::write(temp, contents).await?;
    tokio::fs::rename(temp, target).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(expires_at: &str) -> PutOptions {
        PutOptions {
            http_metadata: HttpMetadata {
                content_type: Some("text/html; charset=utf-8".to_string()),
                ..Default::default()
            },
            custom_metadata: BTreeMap::from([("expiresAt".to_string(), expires_at.to_string())]),
        }
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        assert!(store.get("v1:home:/").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_keeps_body_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path().join("nested")).await.unwrap();
        let body = Bytes::from_static(b"<html>\nline two\n</html>");

        store
            .put("v1:home:/", body.clone(), options("1005"))
            .await
            .unwrap();
        let object = store.get("v1:home:/").await.unwrap().unwrap();

        assert_eq!(object.body, body);
        assert_eq!(
            object.http_metadata.content_type.as_deref(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(object.custom_metadata["expiresAt"], "1005");
    }

    #[tokio::test]
    async fn overwrite_replaces_whole_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();

        store
            .put("k", Bytes::from_static(b"first"), options("1"))
            .await
            .unwrap();
        store
            .put("k", Bytes::from_static(b"second"), PutOptions::default())
            .await
            .unwrap();

        let object = store.get("k").await.unwrap().unwrap();
        assert_eq!(object.body, Bytes::from_static(b"second"));
        assert!(object.custom_metadata.is_empty());

        let files = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(files, 1, "temporary files are renamed away");
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        std::fs::write(store.path_for("k"), b"not json\nbody").unwrap();

        assert!(matches!(
            store.get("k").await,
            Err(BlobStoreError::Metadata(_))
        ));
    }

    fn temp_files(root: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(root)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        // A non-empty directory where the blob should go makes the rename fail.
        let target = store.path_for("k");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("occupied"), b"x").unwrap();

        let result = store
            .put("k", Bytes::from_static(b"body"), options("1"))
            .await;

        assert!(matches!(result, Err(BlobStoreError::Io(_))));
        assert!(temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn failed_write_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("gone");
        let store = FsBlobStore::open(&root).await.unwrap();
        std::fs::remove_dir(&root).unwrap();

        let result = store
            .put("k", Bytes::from_static(b"body"), options("1"))
            .await;

        assert!(matches!(result, Err(BlobStoreError::Io(_))));
        assert!(!root.exists());
        assert!(temp_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn file_name_is_key_digest() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).await.unwrap();
        store
            .put("v1:/videos:/videos?page=2", Bytes::new(), PutOptions::default())
            .await
            .unwrap();

        let expected = dir
            .path()
            .join(format!("{}.blob", digest_key("v1:/videos:/videos?page=2")));
        assert!(expected.exists());
    }
}
