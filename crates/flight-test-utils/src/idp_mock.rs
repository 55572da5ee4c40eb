//! Mock identity provider for integration tests.
//!
//! Wraps a [`wiremock::MockServer`] serving the two provider endpoints the
//! flight API talks to: `/.well-known/jwks.json` and `/userinfo`.

use crate::crypto_fixtures::TestSigningKey;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Key-discovery path.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Profile lookup path.
pub const USERINFO_PATH: &str = "/userinfo";

/// A running mock identity provider.
///
/// # Example
/// ```rust,ignore
/// let idp = MockIdentityProvider::start().await;
/// idp.mount_jwks(&[&key]).await;
/// // Point the API at idp.uri() via AUTH0_BASE_URL
/// ```
pub struct MockIdentityProvider {
    server: MockServer,
}

impl MockIdentityProvider {
    /// Start a mock provider on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL (scheme, host and port, no trailing slash).
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Key-discovery document publishing `keys` in order.
    pub fn jwks_document(keys: &[&TestSigningKey]) -> Value {
        json!({ "keys": keys.iter().map(|k| k.jwk_json()).collect::<Vec<_>>() })
    }

    /// Serve a key-discovery document publishing `keys`.
    pub async fn mount_jwks(&self, keys: &[&TestSigningKey]) {
        self.mount_jwks_response(
            ResponseTemplate::new(200).set_body_json(Self::jwks_document(keys)),
        )
        .await;
    }

    /// Serve `keys` after `delay` (to hold concurrent callers in flight).
    pub async fn mount_jwks_with_delay(&self, keys: &[&TestSigningKey], delay: Duration) {
        self.mount_jwks_response(
            ResponseTemplate::new(200)
                .set_body_json(Self::jwks_document(keys))
                .set_delay(delay),
        )
        .await;
    }

    /// Serve an arbitrary key-discovery response (error statuses, bad bodies).
    pub async fn mount_jwks_response(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(JWKS_PATH))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Serve `profile` to requests presenting exactly `token`.
    pub async fn mount_userinfo(&self, token: &str, profile: Value) {
        Mock::given(method("GET"))
            .and(path(USERINFO_PATH))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile))
            .mount(&self.server)
            .await;
    }

    /// Serve an arbitrary profile response to any request.
    pub async fn mount_userinfo_response(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(USERINFO_PATH))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Number of requests received for `request_path`.
    pub async fn request_count(&self, request_path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == request_path)
            .count()
    }

    /// Number of key-discovery requests received.
    pub async fn jwks_request_count(&self) -> usize {
        self.request_count(JWKS_PATH).await
    }

    /// Number of profile requests received.
    pub async fn userinfo_request_count(&self) -> usize {
        self.request_count(USERINFO_PATH).await
    }
}
