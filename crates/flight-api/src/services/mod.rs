//! Service layer for the flight API.
//!
//! Services that talk to external systems.
//!
//! # Components
//!
//! - `userinfo` - Best-effort profile lookup at the identity provider

pub mod userinfo;

pub use userinfo::UserInfoClient;
