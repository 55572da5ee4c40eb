//! Flight API error types.
//!
//! Every way a protected request can be refused is a variant of
//! [`AuthRejection`]. All variants map to 401 Unauthorized via the
//! `IntoResponse` impl; they differ only in the client-visible message and in
//! the label recorded for metrics. Failures that say nothing useful to a client
//! (bad structure, key lookup, signature) share one generic message. The
//! specific cause is logged server-side.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Reason a bearer token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthRejection {
    /// No `Authorization` header, or it does not start with `"Bearer "`.
    #[error("Missing or invalid Authorization header")]
    MissingAuthHeader,

    /// Token is not a well-formed compact JWT.
    #[error("Unable to verify token")]
    MalformedToken,

    /// The identity provider's key set could not be fetched or parsed.
    #[error("Unable to verify token")]
    KeyFetch,

    /// No key in the key set matches the token's `kid`.
    #[error("Unable to verify token")]
    UnknownKey,

    /// RS256 signature verification failed.
    #[error("Unable to verify token")]
    InvalidSignature,

    /// The `exp` claim is not in the future.
    #[error("Token has expired")]
    ExpiredToken,

    /// The `aud` claim does not contain the expected audience.
    #[error("Invalid audience")]
    InvalidAudience,

    /// The `iss` claim does not match the expected issuer.
    #[error("Invalid issuer")]
    InvalidIssuer,
}

impl AuthRejection {
    /// Bounded label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthRejection::MissingAuthHeader => "missing_auth_header",
            AuthRejection::MalformedToken => "malformed_token",
            AuthRejection::KeyFetch => "key_fetch",
            AuthRejection::UnknownKey => "unknown_key",
            AuthRejection::InvalidSignature => "invalid_signature",
            AuthRejection::ExpiredToken => "expired_token",
            AuthRejection::InvalidAudience => "invalid_audience",
            AuthRejection::InvalidIssuer => "invalid_issuer",
        }
    }

    /// Value for the `WWW-Authenticate` challenge (RFC 6750 section 3).
    ///
    /// A request without credentials gets a bare challenge; a request whose
    /// token was refused gets `error="invalid_token"`.
    fn challenge(&self) -> &'static str {
        match self {
            AuthRejection::MissingAuthHeader => "Bearer realm=\"flight-api\"",
            _ => "Bearer realm=\"flight-api\", error=\"invalid_token\"",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static(self.challenge()),
        );

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    const ALL: [AuthRejection; 8] = [
        AuthRejection::MissingAuthHeader,
        AuthRejection::MalformedToken,
        AuthRejection::KeyFetch,
        AuthRejection::UnknownKey,
        AuthRejection::InvalidSignature,
        AuthRejection::ExpiredToken,
        AuthRejection::InvalidAudience,
        AuthRejection::InvalidIssuer,
    ];

    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_specific_messages() {
        assert_eq!(
            AuthRejection::MissingAuthHeader.to_string(),
            "Missing or invalid Authorization header"
        );
        assert_eq!(AuthRejection::ExpiredToken.to_string(), "Token has expired");
        assert_eq!(AuthRejection::InvalidAudience.to_string(), "Invalid audience");
        assert_eq!(AuthRejection::InvalidIssuer.to_string(), "Invalid issuer");
    }

    #[test]
    fn test_verification_failures_share_generic_message() {
        for rejection in [
            AuthRejection::MalformedToken,
            AuthRejection::KeyFetch,
            AuthRejection::UnknownKey,
            AuthRejection::InvalidSignature,
        ] {
            assert_eq!(rejection.to_string(), "Unable to verify token");
        }
    }

    #[test]
    fn test_kinds_are_distinct() {
        let mut kinds: Vec<&str> = ALL.iter().map(AuthRejection::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), ALL.len());
    }

    #[tokio::test]
    async fn test_every_rejection_is_401_with_error_body() {
        for rejection in ALL {
            let response = rejection.into_response();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body = read_body_json(response.into_body()).await;
            assert_eq!(body, serde_json::json!({ "error": rejection.to_string() }));
        }
    }

    #[tokio::test]
    async fn test_missing_header_challenge_has_no_error_param() {
        let response = AuthRejection::MissingAuthHeader.into_response();

        let www_auth = response
            .headers()
            .get("WWW-Authenticate")
            .unwrap()
            .to_str()
            .unwrap();
        assert_eq!(www_auth, "Bearer realm=\"flight-api\"");
    }

    #[tokio::test]
    async fn test_invalid_token_challenge() {
        let response = AuthRejection::ExpiredToken.into_response();

        let www_auth = response
            .headers()
            .get("WWW-Authenticate")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(www_auth.contains("Bearer realm=\"flight-api\""));
        assert!(www_auth.contains("error=\"invalid_token\""));
    }
}
