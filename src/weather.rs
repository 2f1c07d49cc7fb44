//! Current weather via Open-Meteo

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::ProviderConfig;
use crate::http::{build_client, join_url, send_checked};
use crate::models::WeatherInfo;
use crate::{ErrorCode, TourismError};

/// Weather collaborator: current conditions at a coordinate
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherInfo>;
}

/// Open-Meteo forecast client (no API key required)
pub struct OpenMeteoClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OpenMeteoClient {
    /// Create a new client
    pub fn new(config: &ProviderConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(config, user_agent)?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherInfo> {
        info!(
            "Getting current weather for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );

        let url = format!(
            "{}?latitude={}&longitude={}&current_weather=true&daily=precipitation_probability_max&timezone=auto",
            join_url(&self.base_url, "forecast"),
            latitude,
            longitude
        );
        debug!("Open-Meteo request URL: {}", url);

        let context = HashMap::from([(
            "coordinates".to_string(),
            format!("{latitude:.4},{longitude:.4}"),
        )]);
        let response = send_checked("Open-Meteo", self.client.get(&url), context.clone()).await?;

        let forecast: openmeteo::ForecastResponse = response
            .json()
            .await
            .map_err(|e| {
                warn!("Failed to parse weather response: {}", e);
                anyhow::Error::new(e).context(TourismError::api_with_context(
                    "Invalid weather data received from Open-Meteo",
                    ErrorCode::ApiInvalidResponse,
                    context,
                ))
            })?;

        let weather = WeatherInfo::from(forecast);
        debug!(
            temperature_c = ?weather.temperature_c,
            precip_prob_max = ?weather.precip_prob_max,
            "Current weather"
        );
        Ok(weather)
    }
}

/// Open-Meteo API response structures
mod openmeteo {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub timezone: Option<String>,
        pub current_weather: Option<CurrentWeather>,
        pub daily: Option<DailyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentWeather {
        pub temperature: Option<f64>,
        pub windspeed: Option<f64>,
        pub weathercode: Option<u8>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub precipitation_probability_max: Option<Vec<Option<u8>>>,
    }
}

impl From<openmeteo::ForecastResponse> for WeatherInfo {
    fn from(response: openmeteo::ForecastResponse) -> Self {
        let current = response.current_weather;
        let precip_prob_max = response
            .daily
            .and_then(|daily| daily.precipitation_probability_max)
            .and_then(|values| values.into_iter().next())
            .flatten();

        Self {
            temperature_c: current.as_ref().and_then(|c| c.temperature),
            windspeed: current.as_ref().and_then(|c| c.windspeed),
            weathercode: current.as_ref().and_then(|c| c.weathercode),
            precip_prob_max,
            timezone: response.timezone.unwrap_or_else(|| "auto".to_string()),
        }
    }
}
