//! HTTP request handlers for the flight API.

pub mod flights;
pub mod health;
pub mod metrics;
pub mod verify;

pub use flights::{list_flights, search_flights};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use verify::verify_token;
