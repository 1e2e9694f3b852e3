//! Selector lifecycle integration tests.
//!
//! These tests exercise the selector with a mock dataset source and a
//! mock queue:
//! - Ranking order, stability and truncation
//! - Rank assignment on the published payloads
//! - Per-item publish failure isolation
//! - Fatal dataset failures

use std::sync::Arc;

use serde_json::json;

use marquee_core::{
    config::SelectorConfig,
    testing::{MockDatasetSource, MockQueue},
    DatasetError, MovieRecord, QueueError, Selector, SelectorError,
};

/// Test helper wiring a selector to mocks.
struct TestHarness {
    selector: Selector,
    source: MockDatasetSource,
    queue: MockQueue,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_top_count(10)
    }

    fn with_top_count(top_count: usize) -> Self {
        let source = MockDatasetSource::new();
        let queue = MockQueue::new();
        let selector = Selector::new(
            Arc::new(source.clone()),
            Arc::new(queue.clone()),
            SelectorConfig { top_count },
        );

        Self {
            selector,
            source,
            queue,
        }
    }

    async fn set_dataset(&self, values: Vec<serde_json::Value>) {
        let records = values
            .into_iter()
            .map(|v| MovieRecord::from_value(v).expect("dataset entries are objects"))
            .collect();
        self.source.set_records(records).await;
    }

    async fn published_records(&self) -> Vec<MovieRecord> {
        self.queue
            .published_bodies()
            .await
            .iter()
            .map(|body| serde_json::from_str(body).expect("published bodies are JSON objects"))
            .collect()
    }
}

#[tokio::test]
async fn test_publishes_top_ten_in_descending_rating_order() {
    let harness = TestHarness::new();

    // 12 entries with distinct ratings, deliberately out of order.
    let mut dataset = Vec::new();
    for i in [5, 11, 2, 9, 0, 7, 3, 10, 1, 8, 4, 6] {
        dataset.push(json!({
            "id": format!("tt{:04}", i),
            "imDbRating": format!("{:.1}", 7.0 + (i as f64) * 0.2),
        }));
    }
    harness.set_dataset(dataset).await;

    let report = harness.selector.select_and_publish().await.unwrap();
    assert_eq!(report.selected, 10);
    assert_eq!(report.published, 10);

    let published = harness.published_records().await;
    assert_eq!(published.len(), 10);

    let ranks: Vec<_> = published.iter().map(|r| r.rank()).collect();
    assert_eq!(ranks, (1..=10).collect::<Vec<_>>());

    let ratings: Vec<_> = published.iter().map(|r| r.rating()).collect();
    for pair in ratings.windows(2) {
        assert!(pair[0] > pair[1], "ratings must strictly descend: {:?}", ratings);
    }

    // Highest rating in the fixture is id 11, then 10, ...
    assert_eq!(published[0].id(), Some("tt0011"));
    assert_eq!(published[1].id(), Some("tt0010"));
}

#[tokio::test]
async fn test_publishes_all_when_dataset_is_small() {
    let harness = TestHarness::new();
    harness
        .set_dataset(vec![
            json!({"id": "a", "imDbRating": "8.0"}),
            json!({"id": "b", "imDbRating": "7.5"}),
        ])
        .await;

    let report = harness.selector.select_and_publish().await.unwrap();
    assert_eq!(report.selected, 2);
    assert_eq!(report.published, 2);
}

#[tokio::test]
async fn test_top_one_publishes_exact_payload() {
    let harness = TestHarness::with_top_count(1);
    harness
        .set_dataset(vec![
            json!({"id": "a", "imDbRating": "9.3"}),
            json!({"id": "b", "imDbRating": "9.0"}),
        ])
        .await;

    let report = harness.selector.select_and_publish().await.unwrap();
    assert_eq!(report.published, 1);

    let bodies = harness.queue.published_bodies().await;
    let payload: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(payload, json!({"id": "a", "imDbRating": "9.3", "rank": 1}));
}

#[tokio::test]
async fn test_ties_keep_dataset_order() {
    let harness = TestHarness::new();
    harness
        .set_dataset(vec![
            json!({"id": "first", "imDbRating": "8.8"}),
            json!({"id": "second", "imDbRating": "8.8"}),
        ])
        .await;

    harness.selector.select_and_publish().await.unwrap();

    let published = harness.published_records().await;
    assert_eq!(published[0].id(), Some("first"));
    assert_eq!(published[1].id(), Some("second"));
}

#[tokio::test]
async fn test_publish_failure_does_not_abort_fanout() {
    let harness = TestHarness::new();
    harness
        .set_dataset(vec![
            json!({"id": "a", "imDbRating": "9.3"}),
            json!({"id": "b", "imDbRating": "9.0"}),
            json!({"id": "c", "imDbRating": "8.5"}),
        ])
        .await;

    harness
        .queue
        .set_next_publish_error(QueueError::PublishFailed("broker down".to_string()))
        .await;

    let report = harness.selector.select_and_publish().await.unwrap();
    assert_eq!(report.selected, 3);
    assert_eq!(report.published, 2);

    // The failed item was rank 1; the rest still went out in order.
    let published = harness.published_records().await;
    assert_eq!(published[0].id(), Some("b"));
    assert_eq!(published[1].id(), Some("c"));
}

#[tokio::test]
async fn test_dataset_failure_is_fatal() {
    let harness = TestHarness::new();
    harness
        .source
        .set_next_error(DatasetError::FetchFailed {
            status: 503,
            message: "unavailable".to_string(),
        })
        .await;

    let result = harness.selector.select_and_publish().await;
    assert!(matches!(result, Err(SelectorError::Dataset(_))));
    assert!(harness.queue.published_bodies().await.is_empty());
}

#[tokio::test]
async fn test_rerun_republishes_without_dedup() {
    let harness = TestHarness::new();
    harness
        .set_dataset(vec![json!({"id": "a", "imDbRating": "9.3"})])
        .await;

    harness.selector.select_and_publish().await.unwrap();
    harness.selector.select_and_publish().await.unwrap();

    assert_eq!(harness.queue.published_bodies().await.len(), 2);
    assert_eq!(harness.source.fetch_count().await, 2);
}
