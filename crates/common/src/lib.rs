//! Common utilities and types shared across Flight API components.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limits, unverified header parsing)
pub mod jwt;
