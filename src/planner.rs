//! Request orchestration
//!
//! text -> extraction -> resolution -> (weather | places) -> composition.
//! Lookups run concurrently once coordinates are known, and each one fails on
//! its own without touching the other.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use futures::future::OptionFuture;
use tracing::{debug, info, instrument, warn};

use crate::composer::compose;
use crate::config::AgentConfig;
use crate::extractor::Extractor;
use crate::geocoding::{NominatimClient, PlaceSearch};
use crate::models::{Lookup, PlanResponse, ResolvedLocation, WeatherInfo};
use crate::places::{NearbySearch, OverpassClient, PlacesLookup};
use crate::resolver::PlaceResolver;
use crate::weather::{OpenMeteoClient, WeatherLookup};

/// Answers one travel question end to end
#[derive(Clone)]
pub struct TripPlanner {
    extractor: Extractor,
    resolver: PlaceResolver,
    weather: Arc<dyn WeatherLookup>,
    places: Arc<dyn PlacesLookup>,
    nearby: NearbySearch,
}

impl TripPlanner {
    pub fn new(
        extractor: Extractor,
        search: Arc<dyn PlaceSearch>,
        weather: Arc<dyn WeatherLookup>,
        places: Arc<dyn PlacesLookup>,
        nearby: NearbySearch,
    ) -> Self {
        Self {
            resolver: PlaceResolver::new(search, extractor.clone()),
            extractor,
            weather,
            places,
            nearby,
        }
    }

    /// Wire the HTTP providers described by the configuration
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let search = NominatimClient::new(&config.geocoding, &config.user_agent)?;
        let weather = OpenMeteoClient::new(&config.weather, &config.user_agent)?;
        let places = OverpassClient::new(&config.places, &config.user_agent)?;

        Ok(Self::new(
            Extractor::from_config(&config.intents),
            Arc::new(search),
            Arc::new(weather),
            Arc::new(places),
            NearbySearch::from(&config.places),
        ))
    }

    /// Answer a free-text question. Never fails: unresolved places yield the not-found response.
    #[instrument(skip(self))]
    pub async fn plan(&self, input: &str) -> PlanResponse {
        let start = Instant::now();
        let extraction = self.extractor.extract(input);

        let Some(place) = extraction.place.as_deref() else {
            info!("No place found in query");
            return PlanResponse::not_found();
        };

        let Some(location) = self.resolver.resolve_place(place).await else {
            info!("Could not resolve place '{}'", place);
            return PlanResponse::not_found();
        };

        let weather = OptionFuture::from(
            extraction
                .wants_weather
                .then(|| self.lookup_weather(&location)),
        );
        let places = OptionFuture::from(
            extraction
                .wants_places
                .then(|| self.lookup_places(&location)),
        );
        let (weather, places) = tokio::join!(weather, places);

        let response = compose(
            &extraction,
            &location,
            weather.unwrap_or_default(),
            places.unwrap_or_default(),
        );

        info!(
            "Planned answer for '{}' in {:.3}s",
            location.short_name(),
            start.elapsed().as_secs_f64()
        );
        response
    }

    async fn lookup_weather(&self, location: &ResolvedLocation) -> Lookup<WeatherInfo> {
        match self
            .weather
            .current_weather(location.latitude, location.longitude)
            .await
        {
            Ok(weather) => Lookup::Found(weather),
            Err(e) => {
                warn!(
                    "Weather lookup failed for {}: {:#}",
                    location.format_coordinates(),
                    e
                );
                Lookup::Failed
            }
        }
    }

    async fn lookup_places(&self, location: &ResolvedLocation) -> Lookup<Vec<String>> {
        match self
            .places
            .nearby(location.latitude, location.longitude, self.nearby)
            .await
        {
            Ok(names) => {
                debug!("Places lookup returned {} names", names.len());
                Lookup::Found(names)
            }
            Err(e) => {
                warn!(
                    "Places lookup failed for {}: {:#}",
                    location.format_coordinates(),
                    e
                );
                Lookup::Failed
            }
        }
    }
}
