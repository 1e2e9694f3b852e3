//! Ranked dataset source.
//!
//! The selector needs the full dataset before it can rank anything, so
//! every failure here is fatal to the invocation — there is no partial
//! success.

mod http;

pub use http::HttpDatasetSource;

use async_trait::async_trait;
use thiserror::Error;

use crate::movie::MovieRecord;

/// Errors that can occur while fetching the ranked dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// HTTP request failed (network error, timeout).
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The source answered with a non-2xx status.
    #[error("Dataset fetch failed: {status} - {message}")]
    FetchFailed { status: u16, message: String },

    /// The response body was not one of the accepted dataset shapes.
    #[error("Malformed dataset: {0}")]
    MalformedDataset(String),
}

/// Trait for dataset sources.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch and parse the complete ranked dataset.
    async fn fetch(&self) -> Result<Vec<MovieRecord>, DatasetError>;
}
