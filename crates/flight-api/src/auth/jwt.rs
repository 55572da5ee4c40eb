//! Bearer token verification.
//!
//! Verifies identity-provider access tokens against the provider's published
//! RSA keys and the configured issuer/audience.
//!
//! # Order of checks
//!
//! 1. Parse the unverified header (size limit, three segments, JSON header)
//! 2. Load the key set (fetched once per process)
//! 3. Select the first key whose `kid` matches the header
//! 4. Verify the RS256 signature
//! 5. `nbf` → `exp` → `aud` → `iss`, first failure wins
//!
//! Each failure maps to exactly one [`AuthRejection`] variant.

use crate::auth::claims::Claims;
use crate::auth::jwks::KeySetCache;
use crate::errors::AuthRejection;
use common::jwt::{parse_unverified_header, JwtValidationError};
use common::secret::SecretString;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use std::sync::Arc;
use tracing::instrument;

/// A token that passed every check, with its decoded claims.
///
/// Attached to the request extensions by the auth middleware; lives only for
/// the duration of one request.
#[derive(Debug, Clone)]
pub struct VerifiedToken {
    /// Decoded claims.
    pub claims: Claims,

    /// The token exactly as presented, for forwarding to the provider.
    pub raw_token: SecretString,
}

/// RS256 token verifier bound to one identity provider.
pub struct TokenVerifier {
    /// Cache of the provider's signing keys.
    key_cache: Arc<KeySetCache>,

    /// Audience the token must be issued for.
    audience: String,

    /// Exact expected `iss` value.
    issuer: String,
}

impl TokenVerifier {
    /// Create a new verifier.
    ///
    /// # Arguments
    ///
    /// * `key_cache` - Shared key-set cache
    /// * `audience` - Expected audience
    /// * `issuer` - Expected issuer (`https://{domain}/`)
    pub fn new(key_cache: Arc<KeySetCache>, audience: String, issuer: String) -> Self {
        Self {
            key_cache,
            audience,
            issuer,
        }
    }

    /// Verify a token against the current wall-clock time.
    #[instrument(skip_all, name = "api.auth.verify")]
    pub async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthRejection> {
        self.verify_at(token, chrono::Utc::now().timestamp()).await
    }

    /// Verify a token as of `now` (Unix epoch seconds).
    ///
    /// Prefer [`TokenVerifier::verify`] in production code. This variant makes
    /// expiry boundaries testable without wall-clock dependence.
    pub async fn verify_at(&self, token: &str, now: i64) -> Result<VerifiedToken, AuthRejection> {
        // 1. Header, read without trusting it
        let header = parse_unverified_header(token).map_err(|e| {
            match e {
                JwtValidationError::TokenTooLarge => {
                    tracing::debug!(target: "api.auth.jwt", "Token exceeds size limit");
                }
                JwtValidationError::MalformedToken => {
                    tracing::debug!(target: "api.auth.jwt", "Token is not a compact JWT");
                }
            }
            AuthRejection::MalformedToken
        })?;

        // 2. Key set
        let snapshot = self.key_cache.get_keys().await.map_err(|e| {
            tracing::warn!(target: "api.auth.jwt", error = %e, "Key set unavailable");
            AuthRejection::KeyFetch
        })?;

        // 3. Key selection
        let kid = header.kid.as_deref().ok_or_else(|| {
            tracing::debug!(target: "api.auth.jwt", "Token header has no kid");
            AuthRejection::UnknownKey
        })?;
        let key = snapshot.find(kid).ok_or_else(|| {
            tracing::debug!(target: "api.auth.jwt", kid = %kid, "No signing key matches token kid");
            AuthRejection::UnknownKey
        })?;

        // 4. Signature
        let claims = verify_signature(token, key.decoding_key())?;

        // 5. Claims
        self.validate_claims(&claims, now)?;

        tracing::debug!(target: "api.auth.jwt", kid = %kid, "Token verified");

        Ok(VerifiedToken {
            claims,
            raw_token: SecretString::from(token),
        })
    }

    /// Check `nbf`, then `exp`, then `aud`, then `iss`.
    ///
    /// A token used before its `nbf` has no dedicated rejection kind; it is
    /// reported with the generic `MalformedToken` message.
    fn validate_claims(&self, claims: &Claims, now: i64) -> Result<(), AuthRejection> {
        if claims.nbf.is_some_and(|nbf| nbf > now) {
            tracing::debug!(target: "api.auth.jwt", nbf = ?claims.nbf, now = now, "Token not yet valid");
            return Err(AuthRejection::MalformedToken);
        }

        if claims.exp <= now {
            tracing::debug!(target: "api.auth.jwt", exp = claims.exp, now = now, "Token expired");
            return Err(AuthRejection::ExpiredToken);
        }

        if !claims
            .aud
            .as_ref()
            .is_some_and(|aud| aud.contains(&self.audience))
        {
            tracing::debug!(target: "api.auth.jwt", aud = ?claims.aud, "Token audience mismatch");
            return Err(AuthRejection::InvalidAudience);
        }

        if claims.iss.as_deref() != Some(self.issuer.as_str()) {
            tracing::debug!(target: "api.auth.jwt", iss = ?claims.iss, "Token issuer mismatch");
            return Err(AuthRejection::InvalidIssuer);
        }

        Ok(())
    }
}

/// Verify the RS256 signature and decode the claims.
///
/// Registered-claim validation is disabled here; the verifier applies its own
/// checks in a fixed order afterwards.
fn verify_signature(
    token: &str,
    decoding_key: &jsonwebtoken::DecodingKey,
) -> Result<Claims, AuthRejection> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "api.auth.jwt", error = %e, "Token signature verification failed");
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthRejection::MalformedToken,
            _ => AuthRejection::InvalidSignature,
        }
    })?;

    Ok(token_data.claims)
}
