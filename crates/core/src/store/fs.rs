//! File system blob store implementation.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{BlobStore, StoreError};
use crate::config::StoreConfig;

/// Blob store writing objects as files under a root directory.
///
/// Keys may contain `/` separators (the date partition uses one); each
/// segment becomes a directory level. The content type is implied by the
/// key suffix on this backend and is accepted only for interface parity
/// with object stores.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a new file system blob store.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            root: config.root_dir,
        }
    }

    /// The root directory objects are written under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_key(&self, key: &str) -> Result<PathBuf, StoreError> {
        let path = Path::new(key);

        let valid = !key.is_empty()
            && path.components().all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StoreError::InvalidKey {
                key: key.to_string(),
            });
        }

        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, body: &str, _content_type: &str) -> Result<(), StoreError> {
        let path = self.resolve_key(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        fs::write(&path, body.as_bytes())
            .await
            .map_err(|e| StoreError::WriteFailed {
                key: key.to_string(),
                source: e,
            })?;

        debug!("Stored object {} ({} bytes)", key, body.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FsBlobStore {
        FsBlobStore::new(StoreConfig {
            root_dir: dir.path().to_path_buf(),
            date_partition: true,
        })
    }

    #[tokio::test]
    async fn test_put_writes_object() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);

        s.put("01_tt1.json", r#"{"id":"tt1"}"#, "application/json")
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("01_tt1.json")).unwrap();
        assert_eq!(written, r#"{"id":"tt1"}"#);
    }

    #[tokio::test]
    async fn test_put_creates_partition_directories() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);

        s.put("2026-08-06/01_tt1.json", "{}", "application/json")
            .await
            .unwrap();

        assert!(dir.path().join("2026-08-06/01_tt1.json").exists());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_object() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);

        s.put("01_tt1.json", "old", "application/json").await.unwrap();
        s.put("01_tt1.json", "new", "application/json").await.unwrap();

        let written = std::fs::read_to_string(dir.path().join("01_tt1.json")).unwrap();
        assert_eq!(written, "new");
    }

    #[tokio::test]
    async fn test_put_rejects_traversal_keys() {
        let dir = TempDir::new().unwrap();
        let s = store(&dir);

        for key in ["../escape.json", "/absolute.json", "a/../b.json", ""] {
            let result = s.put(key, "{}", "application/json").await;
            assert!(
                matches!(result, Err(StoreError::InvalidKey { .. })),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
