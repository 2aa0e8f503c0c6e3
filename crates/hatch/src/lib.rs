//! REST client for the Hatch contact-enrichment API.
//!
//! Only the `findPhone` endpoint is wrapped; the enrichment pipeline
//! consumes it through the `PhoneLookup` capability.

pub mod api;
pub mod config;

pub use api::{HatchApiError, HatchClient};
pub use config::HatchConfig;
