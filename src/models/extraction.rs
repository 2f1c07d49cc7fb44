//! Extraction model for a single query

use serde::{Deserialize, Serialize};

/// Place name and intents derived from one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Candidate place name, if any signal was found
    pub place: Option<String>,
    pub wants_weather: bool,
    pub wants_places: bool,
}

impl ExtractionResult {
    /// Build a result, forcing `wants_places` when no intent matched.
    #[must_use]
    pub fn new(place: Option<String>, wants_weather: bool, wants_places: bool) -> Self {
        Self {
            place,
            wants_weather,
            wants_places: wants_places || !wants_weather,
        }
    }
}
