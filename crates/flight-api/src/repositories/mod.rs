//! Repository layer for the flight API.
//!
//! Data access for handlers. The catalog is an in-memory fixed dataset.

pub mod flights;

pub use flights::FlightCatalog;
