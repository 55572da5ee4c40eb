//! # Flight Test Utilities
//!
//! Shared test utilities for the flight API.
//!
//! This crate provides:
//! - Fixed RSA signing keys and JWK views of them (`crypto_fixtures`)
//! - A fluent builder for signed access tokens (`token_builders`)
//! - A mocked identity provider serving JWKS and userinfo (`idp_mock`)
//! - A server harness (`TestFlightServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use flight_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let key = TestSigningKey::new("key-01", primary_key());
//!     let idp = MockIdentityProvider::start().await;
//!     idp.mount_jwks(&[&key]).await;
//!     let server = TestFlightServer::spawn(&idp.uri()).await?;
//!
//!     let token = TestTokenBuilder::new(TEST_DOMAIN, TEST_AUDIENCE).sign(&key);
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/flights", server.url()))
//!         .bearer_auth(token)
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod crypto_fixtures;
pub mod idp_mock;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use crypto_fixtures::{primary_key, secondary_key, RsaKeyFixture, TestSigningKey};
pub use idp_mock::MockIdentityProvider;
pub use server_harness::{TestFlightServer, TEST_AUDIENCE, TEST_DOMAIN};
pub use token_builders::TestTokenBuilder;
