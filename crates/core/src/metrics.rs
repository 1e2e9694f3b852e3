//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Selector (dataset fetches, published movies, publish failures)
//! - Enricher (processed/skipped messages, skip reasons, blob writes)
//! - External services (dataset source, metadata API)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Selector Metrics
// =============================================================================

/// Movies published to the queue.
pub static MOVIES_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_movies_published_total",
        "Total movies published to the queue",
    )
    .unwrap()
});

/// Per-item publish failures (batch continued).
pub static PUBLISH_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_publish_failures_total",
        "Total per-item publish failures",
    )
    .unwrap()
});

/// Selector runs by result.
pub static SELECTOR_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_selector_runs_total", "Total selector invocations"),
        &["result"], // "success", "failed"
    )
    .unwrap()
});

// =============================================================================
// Enricher Metrics
// =============================================================================

/// Messages handled by the enricher, by result.
pub static MESSAGES_PROCESSED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_messages_processed_total",
            "Total queue messages handled by the enricher",
        ),
        &["result"], // "processed", "skipped"
    )
    .unwrap()
});

/// Skipped messages by reason.
pub static MESSAGE_SKIPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("marquee_message_skips_total", "Total skipped messages"),
        &["reason"], // "decode", "parse", "missing_identifier", "enrichment", "persistence"
    )
    .unwrap()
});

/// Enriched records written to the blob store.
pub static BLOB_WRITES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "marquee_blob_writes_total",
        "Total enriched records written to the blob store",
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "marquee_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service"], // "dataset", "metadata"
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Selector
        Box::new(MOVIES_PUBLISHED.clone()),
        Box::new(PUBLISH_FAILURES.clone()),
        Box::new(SELECTOR_RUNS.clone()),
        // Enricher
        Box::new(MESSAGES_PROCESSED.clone()),
        Box::new(MESSAGE_SKIPS.clone()),
        Box::new(BLOB_WRITES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
