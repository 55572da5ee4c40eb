//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for bearer tokens. `SecretString`
//! implements `Debug` with redaction, so any struct deriving `Debug` that holds
//! a token gets safe logging behavior for free. Reading the value requires an
//! explicit `expose_secret()` call, which keeps every place a raw token leaves
//! the process easy to find.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct Verified {
//!     subject: String,
//!     raw_token: SecretString,
//! }
//!
//! let verified = Verified {
//!     subject: "auth0|abc".to_string(),
//!     raw_token: SecretString::from("eyJhbGciOi..."),
//! };
//!
//! assert!(!format!("{verified:?}").contains("eyJhbGciOi"));
//! assert_eq!(verified.raw_token.expose_secret(), "eyJhbGciOi...");
//! ```

pub use secrecy::{ExposeSecret, SecretString};
