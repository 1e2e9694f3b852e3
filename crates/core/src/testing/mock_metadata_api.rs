//! Mock metadata API for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use serde_json::{Map, Value};

use crate::metadata::{MetadataApi, MetadataError};

/// Mock implementation of the MetadataApi trait.
///
/// Provides controllable behavior for testing:
/// - Canned response objects per identifier
/// - Lookup recording for assertions
/// - One-shot error injection
#[derive(Debug, Clone, Default)]
pub struct MockMetadataApi {
    responses: Arc<RwLock<HashMap<String, Map<String, Value>>>>,
    lookups: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<MetadataError>>>,
}

impl MockMetadataApi {
    /// Create a new empty mock metadata API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the response object for an identifier.
    ///
    /// Panics if `response` is not a JSON object; the real API only ever
    /// returns objects on success.
    pub async fn add_response(&self, id: &str, response: Value) {
        let fields = match response {
            Value::Object(fields) => fields,
            other => panic!("metadata responses must be JSON objects, got {}", other),
        };
        self.responses.write().await.insert(id.to_string(), fields);
    }

    /// Identifiers looked up so far, in call order.
    pub async fn recorded_lookups(&self) -> Vec<String> {
        self.lookups.read().await.clone()
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: MetadataError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl MetadataApi for MockMetadataApi {
    async fn lookup(&self, id: &str) -> Result<Map<String, Value>, MetadataError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.lookups.write().await.push(id.to_string());

        self.responses
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| MetadataError::ApiError {
                status: 404,
                message: format!("No metadata for {}", id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_lookup_returns_configured_response() {
        let api = MockMetadataApi::new();
        api.add_response("tt1", json!({"Title": "X"})).await;

        let fields = api.lookup("tt1").await.unwrap();
        assert_eq!(fields.get("Title"), Some(&json!("X")));
        assert_eq!(api.recorded_lookups().await, vec!["tt1"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_an_api_error() {
        let api = MockMetadataApi::new();
        let result = api.lookup("tt404").await;
        assert!(matches!(
            result,
            Err(MetadataError::ApiError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_error_injection_is_one_shot() {
        let api = MockMetadataApi::new();
        api.add_response("tt1", json!({"Title": "X"})).await;
        api.set_next_error(MetadataError::ApiError {
            status: 500,
            message: "down".to_string(),
        })
        .await;

        assert!(api.lookup("tt1").await.is_err());
        assert!(api.lookup("tt1").await.is_ok());
    }
}
