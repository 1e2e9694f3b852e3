//! HTTP dataset source.
//!
//! Fetches a public JSON export (no auth) from a bucket-style location:
//! `<base_url>/<object_key>`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{DatasetError, DatasetSource};
use crate::config::DatasetConfig;
use crate::movie::MovieRecord;

/// Dataset source reading a JSON document over HTTP.
pub struct HttpDatasetSource {
    client: Client,
    url: String,
}

/// The two document shapes the dataset export has been seen in: a bare
/// array, or an object wrapping the array under `items`. Resolved once at
/// parse time; everything downstream sees a plain record sequence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DatasetDocument {
    Wrapped { items: Vec<Value> },
    Bare(Vec<Value>),
}

impl DatasetDocument {
    fn into_items(self) -> Vec<Value> {
        match self {
            Self::Wrapped { items } => items,
            Self::Bare(items) => items,
        }
    }
}

impl HttpDatasetSource {
    /// Create a new HTTP dataset source.
    pub fn new(config: DatasetConfig) -> Result<Self, DatasetError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()?;

        let url = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.object_key
        );

        Ok(Self { client, url })
    }

    /// The fully resolved dataset URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl DatasetSource for HttpDatasetSource {
    async fn fetch(&self) -> Result<Vec<MovieRecord>, DatasetError> {
        debug!("Downloading dataset from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatasetError::FetchFailed {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_dataset(&body)
    }
}

/// Parse a dataset document into movie records.
pub fn parse_dataset(body: &str) -> Result<Vec<MovieRecord>, DatasetError> {
    let document: DatasetDocument = serde_json::from_str(body).map_err(|_| {
        DatasetError::MalformedDataset(
            "expected a movie array or an object with an `items` array".to_string(),
        )
    })?;

    document
        .into_items()
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            MovieRecord::from_value(value).ok_or_else(|| {
                DatasetError::MalformedDataset(format!("entry {} is not a JSON object", index))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(base_url: &str, object_key: &str) -> HttpDatasetSource {
        HttpDatasetSource::new(DatasetConfig {
            base_url: base_url.to_string(),
            object_key: object_key.to_string(),
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn test_url_joins_base_and_key() {
        let s = source("https://movies.example.com", "Top250Movies.json");
        assert_eq!(s.url(), "https://movies.example.com/Top250Movies.json");
    }

    #[test]
    fn test_url_tolerates_trailing_slash() {
        let s = source("https://movies.example.com/", "Top250Movies.json");
        assert_eq!(s.url(), "https://movies.example.com/Top250Movies.json");
    }

    #[test]
    fn test_parse_wrapped_document() {
        let body = r#"{"items": [{"id": "tt1"}, {"id": "tt2"}]}"#;
        let records = parse_dataset(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id(), Some("tt1"));
    }

    #[test]
    fn test_parse_bare_array() {
        let body = r#"[{"id": "tt1"}]"#;
        let records = parse_dataset(body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_wrapped_document_ignores_extra_fields() {
        let body = r#"{"items": [{"id": "tt1"}], "errorMessage": ""}"#;
        let records = parse_dataset(body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        for body in [r#"{"movies": []}"#, r#""top250""#, "42", "not json"] {
            let result = parse_dataset(body);
            assert!(
                matches!(result, Err(DatasetError::MalformedDataset(_))),
                "body {:?} should be rejected",
                body
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_object_entries() {
        let body = r#"{"items": [{"id": "tt1"}, "tt2"]}"#;
        let result = parse_dataset(body);
        assert!(matches!(result, Err(DatasetError::MalformedDataset(_))));
    }

    #[test]
    fn test_parse_empty_items() {
        assert!(parse_dataset(r#"{"items": []}"#).unwrap().is_empty());
        assert!(parse_dataset("[]").unwrap().is_empty());
    }
}
