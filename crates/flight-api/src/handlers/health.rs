//! Health check handler.
//!
//! Liveness probe: unauthenticated and touches no dependency, so it answers
//! even while the identity provider is unreachable.

use crate::models::HealthResponse;
use axum::Json;
use tracing::instrument;

/// Handler for GET /health
///
/// ## Example Response
///
/// ```json
/// { "status": "ok" }
/// ```
#[instrument(skip_all, name = "api.health.check")]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
