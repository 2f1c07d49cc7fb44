//! Data models for the tourism agent
//!
//! This module contains the domain models organized by concern:
//! - Extraction: place name and intents derived from a query
//! - Location: resolved coordinates and display name
//! - Weather: current conditions from the weather provider
//! - Response: the composed answer crossing the system boundary

pub mod extraction;
pub mod location;
pub mod response;
pub mod weather;

// Re-export all public types for convenient access
pub use extraction::ExtractionResult;
pub use location::ResolvedLocation;
pub use response::{Lookup, PlanResponse, ResponseData};
pub use weather::WeatherInfo;
