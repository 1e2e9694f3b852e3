//! Enricher trigger endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::ErrorResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EnricherRunParams {
    /// How many queue messages to pull into this invocation.
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

fn default_max_messages() -> usize {
    10
}

/// Invocation result for an enricher run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnricherRunResponse {
    pub status_code: u16,
    pub body: String,
    pub processed: usize,
    pub skipped: usize,
}

/// POST /api/v1/enricher/run
///
/// Receive a batch from the queue, enrich and persist each message, then
/// ack the batch. Skipped messages are acked too: skips are logged, not
/// retried. The invocation only fails if the queue itself does.
pub async fn run_enricher(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EnricherRunParams>,
) -> impl IntoResponse {
    crate::metrics::INVOCATIONS_TOTAL
        .with_label_values(&["enricher"])
        .inc();

    let messages = match state.queue().receive(params.max_messages).await {
        Ok(messages) => messages,
        Err(e) => {
            error!("Failed to receive queue batch: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let delivered: Vec<String> = messages.iter().map(|m| m.id.clone()).collect();
    let report = state.enricher().process_batch(messages).await;

    for id in &delivered {
        if let Err(e) = state.queue().ack(id).await {
            warn!("Failed to ack message {}: {}", id, e);
        }
    }

    (
        StatusCode::OK,
        Json(EnricherRunResponse {
            status_code: StatusCode::OK.as_u16(),
            body: format!("Processed {} movies", report.processed),
            processed: report.processed,
            skipped: report.skipped,
        }),
    )
        .into_response()
}
