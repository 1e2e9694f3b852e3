//! Keyed blob store the enricher persists records into.

mod fs;

pub use fs::FsBlobStore;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing to the blob store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key escapes the store root or is otherwise unusable.
    #[error("Invalid object key: {key}")]
    InvalidKey { key: String },

    /// Failed to create the directory an object lives under.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an object.
    #[error("Failed to write object {key}")]
    WriteFailed {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for blob stores.
///
/// Put is the only operation the pipeline needs; it carries overwrite
/// semantics so reprocessing a message is idempotent.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `body` at `key`, replacing any existing object.
    async fn put(&self, key: &str, body: &str, content_type: &str) -> Result<(), StoreError>;
}
