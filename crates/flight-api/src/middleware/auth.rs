//! Authentication middleware for protected routes.
//!
//! Extracts the bearer token from the Authorization header, verifies it with
//! the [`TokenVerifier`], and injects the [`VerifiedToken`] into request
//! extensions. A rejected request never reaches the handler.

use crate::auth::{TokenVerifier, VerifiedToken};
use crate::errors::AuthRejection;
use crate::observability::metrics::record_token_validation;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::instrument;

/// Scheme prefix required on the Authorization header (case-sensitive).
const BEARER_PREFIX: &str = "Bearer ";

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    /// Verifier bound to the configured identity provider.
    pub verifier: Arc<TokenVerifier>,
}

/// Extract the bearer token from request headers.
///
/// Returns `MissingAuthHeader` if the header is absent, is not visible ASCII,
/// or does not start with exactly `"Bearer "`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "api.middleware.auth", "Missing Authorization header");
            AuthRejection::MissingAuthHeader
        })?;

    value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        tracing::debug!(target: "api.middleware.auth", "Invalid Authorization header format");
        AuthRejection::MissingAuthHeader
    })
}

/// Decide whether a request may proceed.
///
/// The verifier is not consulted when the header is missing or malformed.
pub async fn gate(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<VerifiedToken, AuthRejection> {
    let token = extract_bearer_token(headers)?;
    verifier.verify(token).await
}

/// Authentication middleware that verifies bearer tokens.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - Returns 401 Unauthorized with a JSON error body if the gate rejects
/// - Continues to the next handler with `VerifiedToken` in extensions otherwise
#[instrument(skip_all, name = "api.middleware.auth")]
pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    match gate(req.headers(), &state.verifier).await {
        Ok(verified) => {
            record_token_validation("success");
            req.extensions_mut().insert(verified);
            Ok(next.run(req).await)
        }
        Err(rejection) => {
            record_token_validation(rejection.kind());
            tracing::info!(
                target: "api.middleware.auth",
                reason = rejection.kind(),
                "Request rejected"
            );
            Err(rejection)
        }
    }
}
