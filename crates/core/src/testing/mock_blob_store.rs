//! Mock blob store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::{BlobStore, StoreError};

/// A recorded put for test assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPut {
    pub key: String,
    pub body: String,
    pub content_type: String,
}

/// Mock implementation of the BlobStore trait.
///
/// Records every put (so overwrites stay visible) and keeps the latest
/// body per key for idempotence assertions.
#[derive(Debug, Clone, Default)]
pub struct MockBlobStore {
    puts: Arc<RwLock<Vec<RecordedPut>>>,
    objects: Arc<RwLock<HashMap<String, String>>>,
    next_error: Arc<RwLock<Option<StoreError>>>,
}

impl MockBlobStore {
    /// Create a new empty mock blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every put performed, in call order.
    pub async fn recorded_puts(&self) -> Vec<RecordedPut> {
        self.puts.read().await.clone()
    }

    /// The latest body stored under a key, if any.
    pub async fn object(&self, key: &str) -> Option<String> {
        self.objects.read().await.get(key).cloned()
    }

    /// Number of distinct keys currently stored.
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Configure the next put to fail with the given error.
    pub async fn set_next_error(&self, error: StoreError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn put(&self, key: &str, body: &str, content_type: &str) -> Result<(), StoreError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.puts.write().await.push(RecordedPut {
            key: key.to_string(),
            body: body.to_string(),
            content_type: content_type.to_string(),
        });
        self.objects
            .write()
            .await
            .insert(key.to_string(), body.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_records_and_stores() {
        let store = MockBlobStore::new();
        store
            .put("01_tt1.json", "{}", "application/json")
            .await
            .unwrap();

        let puts = store.recorded_puts().await;
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].key, "01_tt1.json");
        assert_eq!(puts[0].content_type, "application/json");
        assert_eq!(store.object("01_tt1.json").await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_overwrite_keeps_latest_body() {
        let store = MockBlobStore::new();
        store.put("k", "old", "application/json").await.unwrap();
        store.put("k", "new", "application/json").await.unwrap();

        assert_eq!(store.recorded_puts().await.len(), 2);
        assert_eq!(store.object("k").await.as_deref(), Some("new"));
        assert_eq!(store.object_count().await, 1);
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let store = MockBlobStore::new();
        store
            .set_next_error(StoreError::InvalidKey {
                key: "k".to_string(),
            })
            .await;

        assert!(store.put("k", "{}", "application/json").await.is_err());
        assert!(store.put("k", "{}", "application/json").await.is_ok());
    }
}
