//! Current weather model and display methods

use serde::{Deserialize, Serialize};

/// Current conditions for a resolved location. Every measurement may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherInfo {
    /// Current temperature in Celsius
    pub temperature_c: Option<f64>,
    /// Current wind speed in km/h
    pub windspeed: Option<f64>,
    /// WMO weather condition code
    pub weathercode: Option<u8>,
    /// Today's maximum precipitation probability (0-100)
    pub precip_prob_max: Option<u8>,
    /// IANA timezone of the location, or "auto"
    pub timezone: String,
}

impl WeatherInfo {
    /// Temperature for display, "unknown" when missing
    #[must_use]
    pub fn format_temperature(&self) -> String {
        self.temperature_c
            .map_or_else(|| "unknown".to_string(), |t| t.to_string())
    }

    /// Precipitation probability for display, "unknown" when missing
    #[must_use]
    pub fn format_precipitation(&self) -> String {
        self.precip_prob_max
            .map_or_else(|| "unknown".to_string(), |p| p.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherInfo {
        WeatherInfo {
            temperature_c: Some(18.5),
            windspeed: Some(11.2),
            weathercode: Some(2),
            precip_prob_max: Some(20),
            timezone: "Europe/Paris".to_string(),
        }
    }

    #[test]
    fn test_format_known_values() {
        let weather = sample();
        assert_eq!(weather.format_temperature(), "18.5");
        assert_eq!(weather.format_precipitation(), "20");
    }

    #[test]
    fn test_format_temperature_is_not_rounded() {
        let mut weather = sample();
        weather.temperature_c = Some(7.0);
        assert_eq!(weather.format_temperature(), "7");
        weather.temperature_c = Some(-3.25);
        assert_eq!(weather.format_temperature(), "-3.25");
    }

    #[test]
    fn test_format_missing_values() {
        let mut weather = sample();
        weather.temperature_c = None;
        weather.precip_prob_max = None;
        assert_eq!(weather.format_temperature(), "unknown");
        assert_eq!(weather.format_precipitation(), "unknown");
    }

    #[test]
    fn test_missing_fields_serialize_as_null() {
        let mut weather = sample();
        weather.precip_prob_max = None;
        let json = serde_json::to_value(&weather).unwrap();
        assert!(json["precip_prob_max"].is_null());
        assert_eq!(json["temperature_c"], 18.5);
    }
}
