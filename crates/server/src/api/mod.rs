mod enricher;
mod handlers;
mod routes;
mod selector;

pub use routes::create_router;

use serde::Serialize;

/// Error payload returned by failing endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
