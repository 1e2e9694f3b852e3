//! External metadata API integration.
//!
//! This module provides the client used to enrich queued movie records
//! with additional fields keyed by their identifier.

mod omdb;

pub use omdb::OmdbClient;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur when interacting with the metadata API.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Trait for metadata API clients.
#[async_trait]
pub trait MetadataApi: Send + Sync {
    /// Look up the metadata object for one identifier.
    ///
    /// The returned fields are merged verbatim into the record being
    /// enriched; no schema is imposed here.
    async fn lookup(&self, id: &str) -> Result<Map<String, Value>, MetadataError>;
}
