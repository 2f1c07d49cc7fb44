//! Tourism agent - answers travel questions with weather and nearby places
//!
//! A question is reduced to a place name plus intents, the place is geocoded,
//! and the requested lookups (current weather, points of interest) are merged
//! into a single [`PlanResponse`].

pub mod api;
pub mod composer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod geocoding;
pub mod http;
pub mod logging;
pub mod models;
pub mod places;
pub mod planner;
pub mod resolver;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AgentConfig;
pub use error::{ErrorCode, TourismError};
pub use extractor::{EntityRecognizer, Extractor, RuleBasedRecognizer};
pub use geocoding::{NominatimClient, PlaceSearch};
pub use models::{ExtractionResult, Lookup, PlanResponse, ResolvedLocation, WeatherInfo};
pub use places::{OverpassClient, PlacesLookup};
pub use planner::TripPlanner;
pub use resolver::PlaceResolver;
pub use weather::{OpenMeteoClient, WeatherLookup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
