//! JWT utilities shared across Flight API components.
//!
//! This module provides the framework-free parts of bearer token handling:
//! - Size limits for DoS prevention
//! - Unverified header parsing (declared `alg` and `kid`)
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - Nothing returned here is trusted: the header is read only to pick a
//!   verification key, and the token MUST still be verified afterwards
//! - Error messages are generic to prevent information leakage
//!
//! # Usage
//!
//! ```rust,ignore
//! use common::jwt::parse_unverified_header;
//!
//! let header = parse_unverified_header(token)?;
//! let key = snapshot.find(header.kid.as_deref().unwrap_or_default());
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum allowed JWT size in bytes (8KB).
///
/// JWTs larger than this size are rejected BEFORE any base64 decoding or
/// cryptographic operations.
///
/// - Identity provider access tokens are typically 700-1500 bytes (RS256
///   signature plus a handful of claims)
/// - 8KB allows for large custom claim sets while bounding decode cost
pub const MAX_JWT_SIZE_BYTES: usize = 8192; // 8KB

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading a token header.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds maximum allowed.
    #[error("The access token is invalid")]
    TokenTooLarge,

    /// Token format is invalid (not a compact three-segment JWT, bad base64,
    /// or a header that is not a JSON object).
    #[error("The access token is invalid")]
    MalformedToken,
}

// =============================================================================
// Header Types
// =============================================================================

/// Header fields read from a token before its signature is checked.
///
/// Both fields are optional: their absence is a verification concern, not a
/// parsing one. Callers decide how to treat a token without a `kid`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnverifiedHeader {
    /// Declared signing algorithm (e.g. `RS256`).
    pub alg: Option<String>,

    /// Declared key identifier. Empty or non-string values are treated as absent.
    pub kid: Option<String>,
}

// =============================================================================
// Functions
// =============================================================================

/// Parse the header segment of a compact JWT without verifying the signature.
///
/// # Security
///
/// - Token size is checked BEFORE any parsing (denial-of-service prevention)
/// - This function does NOT validate the token signature
/// - The `kid` value should only be used for key lookup in a trusted key set
///
/// # Errors
///
/// - `TokenTooLarge` - Token exceeds `MAX_JWT_SIZE_BYTES`
/// - `MalformedToken` - Not exactly three segments, header is not base64url,
///   or header is not a JSON object
pub fn parse_unverified_header(token: &str) -> Result<UnverifiedHeader, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    // JWT format: header.payload.signature
    let mut parts = token.split('.');
    let (Some(header_part), Some(_payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        tracing::debug!(
            target: "common.jwt",
            parts = token.split('.').count(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    };

    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT header base64");
        JwtValidationError::MalformedToken
    })?;

    let header: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&header_bytes)
        .map_err(|e| {
            tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT header JSON");
            JwtValidationError::MalformedToken
        })?;

    let string_field = |name: &str| {
        header
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
    };

    Ok(UnverifiedHeader {
        alg: string_field("alg"),
        kid: string_field("kid"),
    })
}

// =============================================================================
// Tests
// =============================================================================
