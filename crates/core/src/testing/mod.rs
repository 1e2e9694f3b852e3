//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of every external service
//! trait, allowing both pipeline stages to be exercised without real
//! infrastructure.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{MockDatasetSource, MockQueue, fixtures};
//!
//! let source = MockDatasetSource::new();
//! source.set_records(vec![fixtures::movie("tt0111161", "9.3")]).await;
//!
//! let queue = MockQueue::new();
//! // Wire into a Selector, run, then assert on queue.published_bodies().
//! ```

mod mock_blob_store;
mod mock_dataset_source;
mod mock_metadata_api;
mod mock_queue;

pub use mock_blob_store::{MockBlobStore, RecordedPut};
pub use mock_dataset_source::MockDatasetSource;
pub use mock_metadata_api::MockMetadataApi;
pub use mock_queue::MockQueue;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Map, Value};

    use crate::movie::MovieRecord;
    use crate::queue::{MessageBody, RawMessage};

    /// Create a movie record with an identifier and a stringified rating.
    pub fn movie(id: &str, rating: &str) -> MovieRecord {
        MovieRecord::from_value(json!({
            "id": id,
            "title": format!("Movie {}", id),
            "imDbRating": rating,
        }))
        .expect("fixture is a JSON object")
    }

    /// Create a queue message with a text body.
    pub fn text_message(id: &str, body: &str) -> RawMessage {
        RawMessage {
            id: id.to_string(),
            body: MessageBody::Text(body.to_string()),
        }
    }

    /// Create a queue message carrying raw bytes.
    pub fn bytes_message(id: &str, body: &[u8]) -> RawMessage {
        RawMessage {
            id: id.to_string(),
            body: MessageBody::Bytes(body.to_vec()),
        }
    }

    /// Create a typical metadata API response payload.
    pub fn metadata_fields(title: &str) -> Map<String, Value> {
        match json!({
            "Title": title,
            "Year": "1994",
            "Genre": "Drama",
            "Response": "True",
        }) {
            Value::Object(fields) => fields,
            _ => unreachable!(),
        }
    }
}
