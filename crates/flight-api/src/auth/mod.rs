//! Bearer-token verification against the identity provider's published keys.
//!
//! # Components
//!
//! - `jwks` - Key-set cache (fetched once, shared by all requests)
//! - `jwt` - Token verifier (header, key lookup, RS256 signature, claims)
//! - `claims` - Claims of a verified token

pub mod claims;
pub mod jwks;
pub mod jwt;

pub use claims::{Audience, Claims};
pub use jwks::{JwksResponse, KeyFetchError, KeySetCache, KeySetSnapshot, SigningKey};
pub use jwt::{TokenVerifier, VerifiedToken};
