//! Place search via Nominatim
//!
//! The resolver only sees the [`PlaceSearch`] trait; [`NominatimClient`] is the
//! HTTP implementation.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::ProviderConfig;
use crate::http::{build_client, join_url, send_checked};
use crate::{ErrorCode, TourismError};

/// Response format requested from the search provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[default]
    Json,
}

impl ResponseFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
        }
    }
}

/// One free-text place search
#[derive(Debug, Clone)]
pub struct PlaceQuery<'a> {
    pub text: &'a str,
    /// Maximum number of matches
    pub limit: u8,
    pub format: ResponseFormat,
}

impl<'a> PlaceQuery<'a> {
    /// Best single match in JSON
    #[must_use]
    pub fn best_match(text: &'a str) -> Self {
        Self {
            text,
            limit: 1,
            format: ResponseFormat::Json,
        }
    }
}

/// A search hit
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

/// Place search collaborator. An empty list means "no match".
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &PlaceQuery<'_>) -> Result<Vec<PlaceMatch>>;
}

/// Nominatim search client
pub struct NominatimClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl NominatimClient {
    /// Create a new client
    pub fn new(config: &ProviderConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(config, user_agent)?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl PlaceSearch for NominatimClient {
    #[instrument(skip(self), fields(place = query.text))]
    async fn search(&self, query: &PlaceQuery<'_>) -> Result<Vec<PlaceMatch>> {
        info!("Geocoding place: '{}'", query.text);

        let url = format!(
            "{}?q={}&format={}&limit={}",
            join_url(&self.base_url, "search"),
            urlencoding::encode(query.text),
            query.format.as_str(),
            query.limit
        );
        debug!("Nominatim request URL: {}", url);

        let context = HashMap::from([("place".to_string(), query.text.to_string())]);
        let response = send_checked("Nominatim", self.client.get(&url), context.clone()).await?;

        let places: Vec<nominatim::Place> = response
            .json()
            .await
            .map_err(|e| {
                warn!("Failed to parse geocoding response for '{}': {}", query.text, e);
                anyhow::Error::new(e).context(TourismError::api_with_context(
                    "Invalid geocoding data received from Nominatim",
                    ErrorCode::ApiInvalidResponse,
                    context.clone(),
                ))
            })?;

        let matches = places
            .into_iter()
            .map(PlaceMatch::try_from)
            .collect::<Result<Vec<_>>>()?;

        if matches.is_empty() {
            warn!("No results found for place '{}'", query.text);
        } else {
            debug!(
                "Geocoding results: {:?}",
                matches
                    .iter()
                    .map(|m| format!("{:.4}, {:.4}", m.latitude, m.longitude))
                    .collect::<Vec<_>>()
            );
        }

        Ok(matches)
    }
}

/// Nominatim wire format
mod nominatim {
    use serde::Deserialize;

    /// Coordinates arrive as decimal strings
    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub lat: String,
        pub lon: String,
        pub display_name: Option<String>,
    }
}

impl TryFrom<nominatim::Place> for PlaceMatch {
    type Error = anyhow::Error;

    fn try_from(place: nominatim::Place) -> Result<Self> {
        let parse = |value: &str, axis: &str| {
            value.trim().parse::<f64>().map_err(|_| {
                TourismError::api_with_context(
                    format!("Invalid {axis} in geocoding result: {value}"),
                    ErrorCode::ApiInvalidResponse,
                    HashMap::new(),
                )
            })
        };

        Ok(Self {
            latitude: parse(&place.lat, "latitude")?,
            longitude: parse(&place.lon, "longitude")?,
            display_name: place.display_name.filter(|name| !name.trim().is_empty()),
        })
    }
}
