//! Flight API models.
//!
//! Contains the response types served by the read endpoints.

use serde::{Deserialize, Serialize};

/// One scheduled flight.
///
/// Times are local wall-clock times; the timezone fields describe them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: u32,
    pub flight_number: String,
    pub airline: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub departure_location: String,
    pub arrival_location: String,
    pub departure_timezone: String,
    pub arrival_timezone: String,
    pub status: String,
}

/// Health check response.
///
/// Returned by the `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the process is serving.
    pub status: String,
}

/// Response of the `/verify` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyResponse {
    /// Always `true`; rejected tokens never reach the handler.
    pub verified: bool,

    /// Every claim of the verified token.
    pub claims: crate::auth::Claims,

    /// Provider profile of the token's subject, or `{}` if unavailable.
    pub user: serde_json::Value,
}
