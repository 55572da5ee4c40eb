//! Token echo handler.
//!
//! Returns the verified claims together with the caller's provider profile.

use crate::auth::VerifiedToken;
use crate::models::VerifyResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::{Extension, Json};
use std::sync::Arc;
use tracing::instrument;

/// Handler for GET /verify
///
/// Requires valid authentication via the auth middleware. The profile lookup
/// is best-effort: `user` is `{}` when it fails, and the response is still 200.
///
/// ## Response
///
/// ```json
/// {
///   "verified": true,
///   "claims": { "sub": "auth0|abc", "aud": "...", "exp": 1700003600, ... },
///   "user": { "email": "user@example.com", ... }
/// }
/// ```
#[instrument(skip_all, name = "api.handlers.verify")]
pub async fn verify_token(
    State(state): State<Arc<AppState>>,
    Extension(verified): Extension<VerifiedToken>,
) -> Json<VerifyResponse> {
    let user = state.userinfo.fetch_profile(&verified.raw_token).await;

    Json(VerifyResponse {
        verified: true,
        claims: verified.claims,
        user,
    })
}
