//! Flight listing and search handlers.
//!
//! Both routes are protected; the auth gate has already accepted the request
//! by the time these run.

use crate::models::Flight;
use crate::routes::AppState;
use axum::extract::{Query, State};
use axum::Json;
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /flights
///
/// Returns the whole catalog in id order.
#[instrument(skip_all, name = "api.handlers.flights.list")]
pub async fn list_flights(State(state): State<Arc<AppState>>) -> Json<Vec<Flight>> {
    Json(state.flights.all().to_vec())
}

/// Handler for GET /flights/search?q=
///
/// Case-insensitive substring match on the flight number. A missing or blank
/// `q` returns `[]`. When `q` is repeated, the first value is used.
#[instrument(skip_all, name = "api.handlers.flights.search")]
pub async fn search_flights(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Flight>> {
    let query = params
        .iter()
        .find(|(name, _)| name == "q")
        .map(|(_, value)| value.as_str())
        .unwrap_or_default();
    let results = state.flights.search(query);

    tracing::debug!(
        target: "api.handlers.flights",
        matches = results.len(),
        "Flight search complete"
    );

    Json(results)
}
