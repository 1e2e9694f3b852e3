//! Mock dataset source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::dataset::{DatasetError, DatasetSource};
use crate::movie::MovieRecord;

/// Mock implementation of the DatasetSource trait.
///
/// Serves a configurable record list and can fail the next fetch on
/// demand.
#[derive(Debug, Clone, Default)]
pub struct MockDatasetSource {
    records: Arc<RwLock<Vec<MovieRecord>>>,
    fetch_count: Arc<RwLock<usize>>,
    next_error: Arc<RwLock<Option<DatasetError>>>,
}

impl MockDatasetSource {
    /// Create a new empty mock dataset source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the dataset served by subsequent fetches.
    pub async fn set_records(&self, records: Vec<MovieRecord>) {
        *self.records.write().await = records;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: DatasetError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        *self.fetch_count.read().await
    }
}

#[async_trait]
impl DatasetSource for MockDatasetSource {
    async fn fetch(&self) -> Result<Vec<MovieRecord>, DatasetError> {
        *self.fetch_count.write().await += 1;

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self.records.read().await.clone())
    }
}
