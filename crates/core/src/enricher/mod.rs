//! Enricher stage: normalize queued records, augment them via the
//! metadata API, and persist them under idempotent keys.
//!
//! Messages are processed independently; nothing a single message does
//! can fail the batch. Every skip is logged with enough context to replay
//! the message by hand.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::metadata::{MetadataApi, MetadataError};
use crate::metrics;
use crate::movie::MovieRecord;
use crate::queue::{MessageBody, RawMessage};
use crate::store::{BlobStore, StoreError};

/// Content type attached to every persisted record.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Enricher configuration.
#[derive(Debug, Clone, Copy)]
pub struct EnricherConfig {
    /// Prefix storage keys with the current UTC date (`YYYY-MM-DD/`).
    ///
    /// Same-day reprocessing overwrites; a later day writes a parallel
    /// partition instead of clobbering the earlier one.
    pub date_partition: bool,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            date_partition: true,
        }
    }
}

/// Why a message was skipped instead of persisted.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Byte body was not valid UTF-8.
    #[error("Invalid UTF-8 in message body: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// Body text was not a JSON object.
    #[error("Invalid JSON payload: {0}")]
    Parse(String),

    /// Neither `id` nor the legacy identifier key carried a value.
    #[error("No identifier in payload: {payload}")]
    MissingIdentifier { payload: String },

    /// Metadata API refused or failed the lookup.
    #[error("Enrichment failed for {id}: {source}")]
    Enrichment {
        id: String,
        #[source]
        source: MetadataError,
    },

    /// Blob store write failed.
    #[error("Persistence failed for {key}: {source}")]
    Persistence {
        key: String,
        #[source]
        source: StoreError,
    },
}

impl SkipReason {
    fn label(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Parse(_) => "parse",
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::Enrichment { .. } => "enrichment",
            Self::Persistence { .. } => "persistence",
        }
    }
}

/// Outcome of one batch invocation.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct BatchReport {
    /// Messages enriched and persisted.
    pub processed: usize,
    /// Messages dropped with a logged reason.
    pub skipped: usize,
}

/// The enricher component.
pub struct Enricher {
    api: Arc<dyn MetadataApi>,
    store: Arc<dyn BlobStore>,
    config: EnricherConfig,
}

impl Enricher {
    /// Create a new enricher.
    pub fn new(
        api: Arc<dyn MetadataApi>,
        store: Arc<dyn BlobStore>,
        config: EnricherConfig,
    ) -> Self {
        Self { api, store, config }
    }

    /// Process a delivered batch, one message at a time.
    ///
    /// Never fails: per-message errors are logged, counted as skips, and
    /// do not touch the other messages in the batch.
    pub async fn process_batch(&self, messages: Vec<RawMessage>) -> BatchReport {
        let partition = self
            .config
            .date_partition
            .then(|| Utc::now().date_naive());

        let mut report = BatchReport::default();
        for message in messages {
            let message_id = message.id.clone();
            match self.process_message(message, partition).await {
                Ok(key) => {
                    report.processed += 1;
                    metrics::MESSAGES_PROCESSED
                        .with_label_values(&["processed"])
                        .inc();
                    debug!("Stored message {} at {}", message_id, key);
                }
                Err(reason) => {
                    report.skipped += 1;
                    metrics::MESSAGES_PROCESSED
                        .with_label_values(&["skipped"])
                        .inc();
                    metrics::MESSAGE_SKIPS
                        .with_label_values(&[reason.label()])
                        .inc();
                    warn!("Skipping message {}: {}", message_id, reason);
                }
            }
        }

        info!(
            "Batch complete: processed={}, skipped={}",
            report.processed, report.skipped
        );
        report
    }

    async fn process_message(
        &self,
        message: RawMessage,
        partition: Option<NaiveDate>,
    ) -> Result<String, SkipReason> {
        let text = normalize_body(message.body)?;

        let mut record: MovieRecord =
            serde_json::from_str(&text).map_err(|e| SkipReason::Parse(e.to_string()))?;
        record.normalize_id();

        let id = record
            .id()
            .map(str::to_string)
            .ok_or(SkipReason::MissingIdentifier { payload: text })?;

        let started = Instant::now();
        let lookup = self.api.lookup(&id).await;
        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["metadata"])
            .observe(started.elapsed().as_secs_f64());
        metrics::EXTERNAL_SERVICE_REQUESTS
            .with_label_values(&["metadata", if lookup.is_ok() { "success" } else { "error" }])
            .inc();

        let extra = lookup.map_err(|source| SkipReason::Enrichment {
            id: id.clone(),
            source,
        })?;
        record.merge(extra);

        // The API's identifier is canonical after the merge.
        let key = storage_key(record.rank(), record.id().unwrap_or(&id), partition);

        let body = record.to_json();
        self.store
            .put(&key, &body, CONTENT_TYPE_JSON)
            .await
            .map_err(|source| SkipReason::Persistence {
                key: key.clone(),
                source,
            })?;
        metrics::BLOB_WRITES.inc();

        Ok(key)
    }
}

/// Normalize a delivered body to its text representation.
fn normalize_body(body: MessageBody) -> Result<String, SkipReason> {
    match body {
        MessageBody::Text(text) => Ok(text),
        MessageBody::Bytes(bytes) => Ok(String::from_utf8(bytes)?),
        MessageBody::Structured(value) => Ok(value.to_string()),
    }
}

/// Derive the storage key for an enriched record.
///
/// `{rank:02}_{id}.json`, optionally under a `YYYY-MM-DD/` partition.
/// Unranked records land at rank 00; ranks past 99 widen naturally.
pub fn storage_key(rank: i64, id: &str, partition: Option<NaiveDate>) -> String {
    let object = format!("{:02}_{}.json", rank, id);
    match partition {
        Some(date) => format!("{}/{}", date.format("%Y-%m-%d"), object),
        None => object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_key_pads_rank() {
        assert_eq!(storage_key(3, "tt1", None), "03_tt1.json");
        assert_eq!(storage_key(10, "tt1", None), "10_tt1.json");
    }

    #[test]
    fn test_storage_key_defaults_unranked_to_zero() {
        assert_eq!(storage_key(0, "tt1", None), "00_tt1.json");
    }

    #[test]
    fn test_storage_key_with_partition() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            storage_key(3, "tt1", Some(date)),
            "2026-08-06/03_tt1.json"
        );
    }

    #[test]
    fn test_storage_key_widens_past_two_digits() {
        assert_eq!(storage_key(100, "tt1", None), "100_tt1.json");
    }

    #[test]
    fn test_normalize_body_text_passthrough() {
        let text = normalize_body(MessageBody::Text("{\"id\":\"tt1\"}".to_string())).unwrap();
        assert_eq!(text, "{\"id\":\"tt1\"}");
    }

    #[test]
    fn test_normalize_body_decodes_bytes() {
        let text = normalize_body(MessageBody::Bytes(b"{\"id\":\"tt1\"}".to_vec())).unwrap();
        assert_eq!(text, "{\"id\":\"tt1\"}");
    }

    #[test]
    fn test_normalize_body_rejects_invalid_utf8() {
        let result = normalize_body(MessageBody::Bytes(vec![0xff, 0xfe]));
        assert!(matches!(result, Err(SkipReason::Decode(_))));
    }

    #[test]
    fn test_normalize_body_serializes_structured_values() {
        let text = normalize_body(MessageBody::Structured(json!({"id": "tt1"}))).unwrap();
        assert_eq!(text, "{\"id\":\"tt1\"}");
    }
}
