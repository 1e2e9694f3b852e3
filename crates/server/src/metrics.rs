//! Prometheus metrics for observability.
//!
//! The server owns the registry; core metrics are pulled in via
//! `marquee_core::metrics::all_metrics()` so both pipeline stages show
//! up on the same `/metrics` endpoint.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Stage invocations triggered over the API.
pub static INVOCATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "marquee_invocations_total",
            "Total stage invocations triggered over the API",
        ),
        &["component"], // "selector", "enricher"
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(INVOCATIONS_TOTAL.clone()))
        .unwrap();

    // Core metrics (selector, enricher, external services)
    for metric in marquee_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
