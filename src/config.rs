//! Configuration management for the tourism agent
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::TourismError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "tourism-agent";

/// Root configuration structure for the tourism agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Place search (geocoding) provider
    pub geocoding: ProviderConfig,
    /// Current weather provider
    pub weather: ProviderConfig,
    /// Points-of-interest provider
    pub places: PlacesConfig,
    /// Keyword sets and gazetteer used by the extractor
    pub intents: IntentsConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// User-Agent sent to every provider
    pub user_agent: String,
}

/// Settings shared by every HTTP provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider (filled by `apply_defaults` when empty)
    #[serde(default)]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Retries on transient failures (0 disables retrying)
    #[serde(default)]
    pub max_retries: u32,
}

/// Points-of-interest provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    #[serde(default = "default_overpass_base_url")]
    pub base_url: String,
    #[serde(default = "default_places_timeout")]
    pub timeout_seconds: u32,
    #[serde(default)]
    pub max_retries: u32,
    /// Search radius around the resolved location, in meters
    #[serde(default = "default_places_radius")]
    pub radius_m: u32,
    /// Maximum number of place names returned
    #[serde(default = "default_places_limit")]
    pub limit: usize,
}

/// Intent keywords and known place names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentsConfig {
    #[serde(default = "default_weather_keywords")]
    pub weather_keywords: Vec<String>,
    #[serde(default = "default_places_keywords")]
    pub places_keywords: Vec<String>,
    /// Extra place names the rule-based recognizer tags as locations
    #[serde(default)]
    pub gazetteer: Vec<String>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Upper bound for a whole `/plan` request
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_open_meteo_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_overpass_base_url() -> String {
    "https://overpass-api.de/api".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_places_timeout() -> u32 {
    30
}

fn default_places_radius() -> u32 {
    5000
}

fn default_places_limit() -> usize {
    5
}

fn default_weather_keywords() -> Vec<String> {
    ["weather", "temperature", "temp", "rain", "forecast"]
        .iter()
        .map(|k| (*k).to_string())
        .collect()
}

fn default_places_keywords() -> Vec<String> {
    ["places", "visit", "tour", "tourist", "trip", "attractions"]
        .iter()
        .map(|k| (*k).to_string())
        .collect()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

fn default_request_timeout() -> u32 {
    60
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_user_agent() -> String {
    "tourism-agent/1.0".to_string()
}

impl ProviderConfig {
    fn with_base_url(base_url: String) -> Self {
        Self {
            base_url,
            timeout_seconds: default_timeout(),
            max_retries: 0,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl PlacesConfig {
    /// Transport settings of the places provider
    #[must_use]
    pub fn provider(&self) -> ProviderConfig {
        ProviderConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: self.timeout_seconds,
            max_retries: self.max_retries,
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            base_url: default_overpass_base_url(),
            timeout_seconds: default_places_timeout(),
            max_retries: 0,
            radius_m: default_places_radius(),
            limit: default_places_limit(),
        }
    }
}

impl Default for IntentsConfig {
    fn default() -> Self {
        Self {
            weather_keywords: default_weather_keywords(),
            places_keywords: default_places_keywords(),
            gazetteer: Vec::new(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds.into())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            geocoding: ProviderConfig::with_base_url(default_nominatim_base_url()),
            weather: ProviderConfig::with_base_url(default_open_meteo_base_url()),
            places: PlacesConfig::default(),
            intents: IntentsConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a file (explicit path, else the default locations) and environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TOURISM_PLACES__LIMIT=8 overrides places.limit
        builder = builder.add_source(
            Environment::with_prefix("TOURISM")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("intents.weather_keywords")
                .with_list_parse_key("intents.places_keywords")
                .with_list_parse_key("intents.gazetteer")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AgentConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_nominatim_base_url();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_open_meteo_base_url();
        }
        if self.places.base_url.is_empty() {
            self.places.base_url = default_overpass_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.places.timeout_seconds == 0 {
            self.places.timeout_seconds = default_places_timeout();
        }
        if self.places.radius_m == 0 {
            self.places.radius_m = default_places_radius();
        }
        if self.places.limit == 0 {
            self.places.limit = default_places_limit();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.user_agent.is_empty() {
            self.user_agent = default_user_agent();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, provider) in self.providers() {
            if provider.timeout_seconds > 300 {
                return Err(TourismError::config(format!(
                    "{name} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
            if provider.max_retries > 10 {
                return Err(
                    TourismError::config(format!("{name} max retries cannot exceed 10")).into(),
                );
            }
        }

        if !(1..=50).contains(&self.places.limit) {
            return Err(TourismError::config("Places limit must be between 1 and 50").into());
        }

        if !(1..=50_000).contains(&self.places.radius_m) {
            return Err(
                TourismError::config("Places radius must be between 1 and 50000 meters").into(),
            );
        }

        if self.server.port == 0 {
            return Err(TourismError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TourismError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TourismError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, provider) in self.providers() {
            if !provider.base_url.starts_with("http://")
                && !provider.base_url.starts_with("https://")
            {
                return Err(TourismError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.intents.weather_keywords.iter().all(|k| k.trim().is_empty())
            || self.intents.places_keywords.iter().all(|k| k.trim().is_empty())
        {
            return Err(TourismError::config("Intent keyword sets cannot be empty").into());
        }

        Ok(())
    }

    fn providers(&self) -> [(&'static str, ProviderConfig); 3] {
        [
            ("Geocoding", self.geocoding.clone()),
            ("Weather", self.weather.clone()),
            ("Places", self.places.provider()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.places.timeout_seconds, 30);
        assert_eq!(config.places.radius_m, 5000);
        assert_eq!(config.places.limit, 5);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.user_agent, "tourism-agent/1.0");
        assert!(config.intents.weather_keywords.contains(&"forecast".to_string()));
        assert!(config.intents.places_keywords.contains(&"attractions".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AgentConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AgentConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Weather timeout cannot exceed")
        );
    }

    #[test]
    fn test_config_validation_places_limit() {
        let mut config = AgentConfig::default();
        config.places.limit = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url() {
        let mut config = AgentConfig::default();
        config.geocoding.base_url = "nominatim.local".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Geocoding base URL"));
    }

    #[test]
    fn test_config_validation_empty_keywords() {
        let mut config = AgentConfig::default();
        config.intents.places_keywords = vec![String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = AgentConfig::default();
        config.places.limit = 0;
        config.weather.timeout_seconds = 0;
        config.user_agent.clear();
        config.apply_defaults();
        assert_eq!(config.places.limit, 5);
        assert_eq!(config.weather.timeout_seconds, 10);
        assert_eq!(config.user_agent, "tourism-agent/1.0");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "tourism-agent-config-{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[places]\nlimit = 8\nradius_m = 2000\n\n[server]\nport = 9100\n\n[intents]\ngazetteer = [\"Kyoto\"]"
        )
        .unwrap();

        let config = AgentConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.places.limit, 8);
        assert_eq!(config.places.radius_m, 2000);
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.intents.gazetteer, vec!["Kyoto".to_string()]);
        // untouched sections keep their defaults
        assert_eq!(config.weather.base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.intents.weather_keywords.len(), 5);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = AgentConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("tourism-agent"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
