//! Key-set cache for the identity provider's public signing keys.
//!
//! Fetches the provider's `/.well-known/jwks.json` document on first use and
//! keeps the resulting snapshot for the lifetime of the process.
//!
//! # Behavior
//!
//! - At most one fetch is in flight: concurrent first callers wait for it and
//!   all observe the same `Arc<KeySetSnapshot>`
//! - A successful snapshot is never refreshed or expired (no TTL)
//! - A failed fetch stores nothing, so the next caller retries
//! - Only RSA keys with a `kid` are kept; other entries cannot verify RS256

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::instrument;

use crate::observability::metrics;

/// Timeout for the key-discovery request.
pub const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON Web Key as published by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type ("RSA" for RS256 keys).
    pub kty: String,

    /// Key ID - matched against the token header's `kid`.
    #[serde(default)]
    pub kid: Option<String>,

    /// RSA modulus (base64url encoded).
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent (base64url encoded).
    #[serde(default)]
    pub e: Option<String>,

    /// Algorithm (usually "RS256").
    #[serde(default)]
    pub alg: Option<String>,

    /// Key use (usually "sig").
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
}

/// Key-discovery document.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksResponse {
    /// List of JSON Web Keys.
    pub keys: Vec<Jwk>,
}

/// An RSA public key ready for signature verification.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    decoding_key: DecodingKey,
}

impl SigningKey {
    /// Build a signing key from a JWK.
    ///
    /// Returns `None` for anything that cannot verify an RS256 signature:
    /// non-RSA key types, keys without a `kid`, or unusable `n`/`e` values.
    pub fn from_jwk(jwk: &Jwk) -> Option<Self> {
        if jwk.kty != "RSA" {
            tracing::warn!(target: "api.auth.jwks", kty = %jwk.kty, "Skipping non-RSA JWK");
            return None;
        }

        let Some(kid) = jwk.kid.as_ref().filter(|kid| !kid.is_empty()) else {
            tracing::warn!(target: "api.auth.jwks", "Skipping JWK without kid");
            return None;
        };

        let (Some(n), Some(e)) = (jwk.n.as_deref(), jwk.e.as_deref()) else {
            tracing::warn!(target: "api.auth.jwks", kid = %kid, "Skipping RSA JWK without n/e");
            return None;
        };

        match DecodingKey::from_rsa_components(n, e) {
            Ok(decoding_key) => Some(Self {
                kid: kid.clone(),
                decoding_key,
            }),
            Err(err) => {
                tracing::warn!(target: "api.auth.jwks", kid = %kid, error = %err, "Skipping JWK with invalid RSA components");
                None
            }
        }
    }

    /// Key identifier.
    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Public key material for `jsonwebtoken::decode`.
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &"RS256")
            .finish_non_exhaustive()
    }
}

/// Ordered set of signing keys from one fetch of the key-discovery document.
#[derive(Debug, Clone, Default)]
pub struct KeySetSnapshot {
    keys: Vec<SigningKey>,
}

impl KeySetSnapshot {
    /// Build a snapshot from a key-discovery document, keeping document order.
    pub fn from_jwks(jwks: &JwksResponse) -> Self {
        Self {
            keys: jwks.keys.iter().filter_map(SigningKey::from_jwk).collect(),
        }
    }

    /// First key whose identifier equals `kid`.
    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    /// Keys in document order.
    pub fn keys(&self) -> &[SigningKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Why the key-discovery document could not be obtained.
#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("Key discovery request failed: {0}")]
    Request(String),

    #[error("Key discovery endpoint returned status {0}")]
    Status(u16),

    #[error("Key discovery response is malformed: {0}")]
    InvalidBody(String),
}

impl KeyFetchError {
    fn label(&self) -> &'static str {
        match self {
            KeyFetchError::Request(_) => "request_error",
            KeyFetchError::Status(_) => "bad_status",
            KeyFetchError::InvalidBody(_) => "invalid_body",
        }
    }
}

/// Lazily populated, process-lifetime cache of the provider's signing keys.
pub struct KeySetCache {
    /// URL to the key-discovery endpoint.
    jwks_url: String,

    /// HTTP client for fetching the key set.
    http_client: reqwest::Client,

    /// Snapshot, populated once by the first successful fetch.
    snapshot: OnceCell<Arc<KeySetSnapshot>>,
}

impl KeySetCache {
    /// Create an empty cache for the given key-discovery URL.
    pub fn new(jwks_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(JWKS_FETCH_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "api.auth.jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url,
            http_client,
            snapshot: OnceCell::new(),
        }
    }

    /// Create a cache that already holds `snapshot` and never fetches.
    pub fn preloaded(snapshot: KeySetSnapshot) -> Self {
        Self {
            jwks_url: String::new(),
            http_client: reqwest::Client::new(),
            snapshot: OnceCell::new_with(Some(Arc::new(snapshot))),
        }
    }

    /// Return the current key set, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns `KeyFetchError` if the endpoint is unreachable, times out,
    /// answers with a non-success status, or returns a malformed document.
    pub async fn get_keys(&self) -> Result<Arc<KeySetSnapshot>, KeyFetchError> {
        let snapshot = self
            .snapshot
            .get_or_try_init(|| self.fetch_snapshot())
            .await?;

        Ok(Arc::clone(snapshot))
    }

    /// Whether a snapshot has been stored.
    pub fn is_populated(&self) -> bool {
        self.snapshot.initialized()
    }

    /// Fetch and parse the key-discovery document.
    #[instrument(skip(self), fields(url = %self.jwks_url))]
    async fn fetch_snapshot(&self) -> Result<Arc<KeySetSnapshot>, KeyFetchError> {
        let start = Instant::now();
        let result = self.fetch_jwks().await;

        match &result {
            Ok(_) => metrics::record_jwks_fetch("success", start.elapsed()),
            Err(e) => {
                tracing::error!(target: "api.auth.jwks", error = %e, "Failed to fetch JWKS");
                metrics::record_jwks_fetch(e.label(), start.elapsed());
            }
        }

        let jwks = result?;
        let snapshot = KeySetSnapshot::from_jwks(&jwks);

        tracing::info!(
            target: "api.auth.jwks",
            published = jwks.keys.len(),
            usable = snapshot.len(),
            "JWKS snapshot stored"
        );

        Ok(Arc::new(snapshot))
    }

    async fn fetch_jwks(&self) -> Result<JwksResponse, KeyFetchError> {
        tracing::debug!(target: "api.auth.jwks", "Fetching JWKS from identity provider");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| KeyFetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyFetchError::Status(status.as_u16()));
        }

        response
            .json::<JwksResponse>()
            .await
            .map_err(|e| KeyFetchError::InvalidBody(e.to_string()))
    }
}
