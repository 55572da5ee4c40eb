//! Flight API Service Library
//!
//! A small HTTP backend that serves flight data to callers holding an access
//! token from a third-party identity provider:
//!
//! - Bearer-token verification (RS256) against the provider's published keys
//! - Key-set cache fetched once per process, single-flight
//! - Protected read endpoints over an in-memory flight catalog
//! - Best-effort profile lookup for the token's subject
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> handlers/*.rs -> repositories/*.rs
//!                        |                    |
//!                   auth/jwt.rs          services/*.rs
//!                        |
//!                   auth/jwks.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - Key-set cache, token verifier and claims
//! - `config` - Service configuration from environment
//! - `errors` - Rejection taxonomy with HTTP mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - Auth gate and HTTP metrics
//! - `models` - Response types
//! - `observability` - Prometheus metrics
//! - `repositories` - Flight catalog
//! - `routes` - Axum router setup
//! - `services` - Outbound identity-provider calls

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
