//! Response composition
//!
//! Merges the resolved location and whichever lookups were requested into one
//! [`PlanResponse`]. The weather block always precedes the places block.

use crate::models::{
    ExtractionResult, Lookup, PlanResponse, ResolvedLocation, ResponseData, WeatherInfo,
};

const WEATHER_UNAVAILABLE: &str = "I couldn't fetch weather information right now.";
const PLACES_UNAVAILABLE: &str = "I couldn't fetch tourist places right now.";
const NO_PLACES_NEARBY: &str = "I couldn't find tourist places nearby.";
const PLACES_LEAD_IN: &str = "And these are the places you can go:";

/// Build the answer for a resolved location
#[must_use]
pub fn compose(
    intents: &ExtractionResult,
    location: &ResolvedLocation,
    weather: Lookup<WeatherInfo>,
    places: Lookup<Vec<String>>,
) -> PlanResponse {
    let mut parts = vec![format!("In {}", location.short_name())];

    if intents.wants_weather {
        parts.push(weather_sentence(&weather));
    }

    if intents.wants_places {
        parts.extend(places_section(&places));
    }

    PlanResponse {
        ok: true,
        message: parts.join(" "),
        data: ResponseData {
            place: Some(location.display_name.clone()),
            weather,
            places,
        },
    }
}

fn weather_sentence(weather: &Lookup<WeatherInfo>) -> String {
    match weather.as_found() {
        Some(info) => format!(
            "it's currently {}°C with a {}% chance of rain.",
            info.format_temperature(),
            info.format_precipitation()
        ),
        None => WEATHER_UNAVAILABLE.to_string(),
    }
}

fn places_section(places: &Lookup<Vec<String>>) -> Vec<String> {
    match places.as_found() {
        None => vec![PLACES_UNAVAILABLE.to_string()],
        Some(names) if names.is_empty() => vec![NO_PLACES_NEARBY.to_string()],
        Some(names) => std::iter::once(PLACES_LEAD_IN.to_string())
            .chain(names.iter().map(|name| format!("- {name}")))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> ResolvedLocation {
        ResolvedLocation::new(48.8589, 2.32, "Paris, Île-de-France, France")
    }

    fn weather(temperature_c: Option<f64>, precip_prob_max: Option<u8>) -> WeatherInfo {
        WeatherInfo {
            temperature_c,
            windspeed: Some(7.0),
            weathercode: Some(1),
            precip_prob_max,
            timezone: "Europe/Paris".to_string(),
        }
    }

    fn intents(wants_weather: bool, wants_places: bool) -> ExtractionResult {
        ExtractionResult {
            place: Some("Paris".to_string()),
            wants_weather,
            wants_places,
        }
    }

    #[test]
    fn test_weather_only() {
        let response = compose(
            &intents(true, false),
            &paris(),
            Lookup::Found(weather(Some(18.5), Some(20))),
            Lookup::NotRequested,
        );
        assert!(response.ok);
        assert_eq!(
            response.message,
            "In Paris it's currently 18.5°C with a 20% chance of rain."
        );
        assert_eq!(
            response.data.place.as_deref(),
            Some("Paris, Île-de-France, France")
        );
        assert!(response.data.places.is_not_requested());
    }

    #[test]
    fn test_places_list_is_bulleted_in_order() {
        let names = vec![
            "Fushimi Inari Shrine".to_string(),
            "Kinkaku-ji".to_string(),
            "Arashiyama Bamboo Grove".to_string(),
        ];
        let response = compose(
            &intents(false, true),
            &ResolvedLocation::new(35.0, 135.7, "Kyoto, Japan"),
            Lookup::NotRequested,
            Lookup::Found(names.clone()),
        );
        assert_eq!(
            response.message,
            "In Kyoto And these are the places you can go: - Fushimi Inari Shrine - Kinkaku-ji - Arashiyama Bamboo Grove"
        );
        assert_eq!(response.data.places, Lookup::Found(names));
    }

    #[test]
    fn test_empty_places_differs_from_failed_places() {
        let empty = compose(
            &intents(false, true),
            &paris(),
            Lookup::NotRequested,
            Lookup::Found(Vec::new()),
        );
        assert!(empty.message.ends_with("I couldn't find tourist places nearby."));
        assert_eq!(empty.data.places, Lookup::Found(Vec::new()));

        let failed = compose(
            &intents(false, true),
            &paris(),
            Lookup::NotRequested,
            Lookup::Failed,
        );
        assert!(failed.message.ends_with("I couldn't fetch tourist places right now."));
        assert!(failed.data.places.is_failed());
    }

    #[test]
    fn test_weather_failure_keeps_places() {
        let response = compose(
            &intents(true, true),
            &paris(),
            Lookup::Failed,
            Lookup::Found(vec!["Louvre".to_string()]),
        );
        assert!(response.ok);
        assert_eq!(
            response.message,
            "In Paris I couldn't fetch weather information right now. And these are the places you can go: - Louvre"
        );
        assert!(response.data.weather.is_failed());
    }

    #[test]
    fn test_weather_block_precedes_places_block() {
        let response = compose(
            &intents(true, true),
            &paris(),
            Lookup::Found(weather(Some(12.0), Some(80))),
            Lookup::Found(vec!["Louvre".to_string()]),
        );
        let weather_at = response.message.find("chance of rain").unwrap();
        let places_at = response.message.find("places you can go").unwrap();
        assert!(weather_at < places_at);
    }

    #[test]
    fn test_missing_weather_fields_render_unknown() {
        let response = compose(
            &intents(true, false),
            &paris(),
            Lookup::Found(weather(Some(9.4), None)),
            Lookup::NotRequested,
        );
        assert_eq!(
            response.message,
            "In Paris it's currently 9.4°C with a unknown% chance of rain."
        );
    }
}
