//! Selector stage: rank the dataset and fan it out to the queue.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SelectorConfig;
use crate::dataset::{DatasetError, DatasetSource};
use crate::metrics;
use crate::movie::MovieRecord;
use crate::queue::QueuePublisher;

/// Errors fatal to a selector invocation.
///
/// Per-item publish failures are not here on purpose: fan-out is
/// best-effort and failures only lower the published count.
#[derive(Debug, Error)]
pub enum SelectorError {
    /// Fetching or parsing the dataset failed; ranking needs the full
    /// set, so there is no partial result to salvage.
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
}

/// Outcome of one selector invocation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SelectorReport {
    /// Entries selected after ranking and truncation.
    pub selected: usize,
    /// Messages actually published.
    pub published: usize,
}

/// The selector component.
pub struct Selector {
    source: Arc<dyn DatasetSource>,
    queue: Arc<dyn QueuePublisher>,
    config: SelectorConfig,
}

impl Selector {
    /// Create a new selector.
    pub fn new(
        source: Arc<dyn DatasetSource>,
        queue: Arc<dyn QueuePublisher>,
        config: SelectorConfig,
    ) -> Self {
        Self {
            source,
            queue,
            config,
        }
    }

    /// Fetch the dataset, rank it, and publish the top entries.
    ///
    /// Publishes one message per ranked record, in rank order. A failed
    /// publish is logged and skipped; the remaining records still go out.
    pub async fn select_and_publish(&self) -> Result<SelectorReport, SelectorError> {
        let started = Instant::now();
        let fetched = self.source.fetch().await;
        metrics::EXTERNAL_SERVICE_DURATION
            .with_label_values(&["dataset"])
            .observe(started.elapsed().as_secs_f64());

        let records = match fetched {
            Ok(records) => {
                metrics::EXTERNAL_SERVICE_REQUESTS
                    .with_label_values(&["dataset", "success"])
                    .inc();
                records
            }
            Err(e) => {
                metrics::EXTERNAL_SERVICE_REQUESTS
                    .with_label_values(&["dataset", "error"])
                    .inc();
                metrics::SELECTOR_RUNS.with_label_values(&["failed"]).inc();
                return Err(e.into());
            }
        };

        let total = records.len();
        let ranked = rank_top(records, self.config.top_count);
        info!(
            "Selected top {} of {} dataset entries",
            ranked.len(),
            total
        );

        let mut published = 0;
        for record in &ranked {
            let payload = record.to_json();
            match self.queue.publish(&payload).await {
                Ok(()) => {
                    published += 1;
                    metrics::MOVIES_PUBLISHED.inc();
                }
                Err(e) => {
                    metrics::PUBLISH_FAILURES.inc();
                    warn!(
                        "Failed to publish rank {} ({}): {}",
                        record.rank(),
                        record.id().unwrap_or("<no id>"),
                        e
                    );
                }
            }
        }

        metrics::SELECTOR_RUNS.with_label_values(&["success"]).inc();
        info!("Published {}/{} ranked movies", published, ranked.len());

        Ok(SelectorReport {
            selected: ranked.len(),
            published,
        })
    }
}

/// Sort descending by rating, truncate to the top `count`, assign ranks.
///
/// The sort is stable: entries with equal ratings keep their dataset
/// order, so re-running over an unchanged dataset yields identical ranks.
fn rank_top(mut records: Vec<MovieRecord>, count: usize) -> Vec<MovieRecord> {
    records.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    records.truncate(count);

    for (index, record) in records.iter_mut().enumerate() {
        record.set_rank(index as i64 + 1);
    }

    records
}
