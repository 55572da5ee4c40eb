//! Builder patterns for test data construction
//!
//! Provides a fluent API for creating identity-provider access tokens.

use crate::crypto_fixtures::TestSigningKey;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, Header};
use serde_json::{json, Map, Value};

/// Builder for creating signed test access tokens.
///
/// Defaults produce a token that a verifier configured for the same
/// `domain` and `audience` accepts: issuer `https://{domain}/`, the audience,
/// issued now and valid for one hour.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new("tenant.example.com", "https://flights.example.com")
///     .for_user("auth0|alice")
///     .expires_in(3600)
///     .sign(&key);
/// ```
pub struct TestTokenBuilder {
    iss: Option<String>,
    sub: Option<String>,
    aud: Option<Value>,
    exp: i64,
    iat: i64,
    extra: Map<String, Value>,
    include_kid: bool,
}

impl TestTokenBuilder {
    /// Create a new token builder for the given provider domain and audience.
    pub fn new(domain: &str, audience: &str) -> Self {
        let now = Utc::now();
        Self {
            iss: Some(format!("https://{}/", domain)),
            sub: Some("auth0|test-user".to_string()),
            aud: Some(json!(audience)),
            exp: (now + Duration::seconds(3600)).timestamp(),
            iat: now.timestamp(),
            extra: Map::new(),
            include_kid: true,
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    /// Set a single audience
    pub fn with_audience(mut self, audience: &str) -> Self {
        self.aud = Some(json!(audience));
        self
    }

    /// Set a list of audiences
    pub fn with_audiences(mut self, audiences: &[&str]) -> Self {
        self.aud = Some(json!(audiences));
        self
    }

    /// Omit the `aud` claim
    pub fn without_audience(mut self) -> Self {
        self.aud = None;
        self
    }

    /// Set the issuer
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_string());
        self
    }

    /// Omit the `iss` claim
    pub fn without_issuer(mut self) -> Self {
        self.iss = None;
        self
    }

    /// Set expiration in seconds from now (negative for already expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = (Utc::now() + Duration::seconds(seconds)).timestamp();
        self
    }

    /// Set an absolute expiration timestamp
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.exp = timestamp;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = timestamp;
        self
    }

    /// Add any other claim (`scope`, `azp`, namespaced custom claims, ...)
    pub fn with_claim(mut self, name: &str, value: Value) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// Leave `kid` out of the token header
    pub fn without_kid(mut self) -> Self {
        self.include_kid = false;
        self
    }

    /// Build the claims as a JSON value
    pub fn claims(&self) -> Value {
        let mut claims = self.extra.clone();
        if let Some(iss) = &self.iss {
            claims.insert("iss".to_string(), json!(iss));
        }
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), json!(sub));
        }
        if let Some(aud) = &self.aud {
            claims.insert("aud".to_string(), aud.clone());
        }
        claims.insert("exp".to_string(), json!(self.exp));
        claims.insert("iat".to_string(), json!(self.iat));
        Value::Object(claims)
    }

    /// Sign the token with `key` (RS256).
    pub fn sign(&self, key: &TestSigningKey) -> String {
        let claims = self.claims();
        if self.include_kid {
            key.sign_claims(&claims)
        } else {
            key.sign_with_header(&Header::new(Algorithm::RS256), &claims)
        }
    }
}
