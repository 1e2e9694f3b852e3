//! Selector trigger endpoint.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use tracing::error;

use super::ErrorResponse;
use crate::state::AppState;

/// Invocation result for a selector run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorRunResponse {
    pub status_code: u16,
    pub body: String,
    pub selected: usize,
    pub published: usize,
}

/// POST /api/v1/selector/run
///
/// Fetch the dataset, rank it, and publish the top entries to the queue.
/// A dataset failure fails the whole invocation; per-item publish
/// failures only lower the published count.
pub async fn run_selector(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    crate::metrics::INVOCATIONS_TOTAL
        .with_label_values(&["selector"])
        .inc();

    match state.selector().select_and_publish().await {
        Ok(report) => (
            StatusCode::OK,
            Json(SelectorRunResponse {
                status_code: StatusCode::OK.as_u16(),
                body: format!("Sent {} movies to queue", report.published),
                selected: report.selected,
                published: report.published,
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Selector run failed: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
