//! OMDB API client.
//!
//! OMDB requires an API key for access and answers a single GET with the
//! whole metadata object: `https://www.omdbapi.com/?apikey=<key>&i=<id>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use super::{MetadataApi, MetadataError};
use crate::config::MetadataConfig;

/// OMDB API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDB client.
    pub fn new(config: MetadataConfig) -> Result<Self, MetadataError> {
        if config.api_key.is_empty() {
            return Err(MetadataError::NotConfigured(
                "OMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://www.omdbapi.com".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }
}

#[async_trait]
impl MetadataApi for OmdbClient {
    async fn lookup(&self, id: &str) -> Result<Map<String, Value>, MetadataError> {
        debug!("OMDB lookup: id={}", id);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("i", id)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(MetadataError::NotConfigured(
                "Invalid OMDB API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let value: Value = response.json().await.map_err(|e| {
            MetadataError::ParseError(format!("Failed to parse lookup response: {}", e))
        })?;

        match value {
            Value::Object(fields) => Ok(fields),
            other => Err(MetadataError::ParseError(format!(
                "expected a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
