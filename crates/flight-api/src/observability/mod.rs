//! Observability for the flight API.
//!
//! - `metrics` - Prometheus metric definitions and recorder setup

pub mod metrics;
