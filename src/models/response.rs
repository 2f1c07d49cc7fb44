//! The composed answer and its tri-state lookup fields

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::WeatherInfo;

/// Shown to the caller when no place could be resolved
pub const PLACE_NOT_FOUND_MESSAGE: &str = "I don't know this place exists.";

/// Outcome of one downstream lookup.
///
/// Serializes as: field omitted (`NotRequested`, with `skip_serializing_if`),
/// `null` (`Failed`), or the value (`Found`).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Lookup<T> {
    #[default]
    NotRequested,
    Failed,
    Found(T),
}

impl<T> Lookup<T> {
    #[must_use]
    pub fn is_not_requested(&self) -> bool {
        matches!(self, Lookup::NotRequested)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed)
    }

    #[must_use]
    pub fn as_found(&self) -> Option<&T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    /// A requested lookup: `None` means it failed.
    fn from(value: Option<T>) -> Self {
        value.map_or(Lookup::Failed, Lookup::Found)
    }
}

impl<T: Serialize> Serialize for Lookup<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Lookup::Found(value) => serializer.serialize_some(value),
            Lookup::Failed | Lookup::NotRequested => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Lookup<T> {
    // missing fields are handled by `#[serde(default)]` on the container
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}

/// Structured payload next to the prose message
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Lookup::is_not_requested")]
    pub weather: Lookup<WeatherInfo>,
    #[serde(default, skip_serializing_if = "Lookup::is_not_requested")]
    pub places: Lookup<Vec<String>>,
}

/// The only entity exposed across the system boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub ok: bool,
    pub message: String,
    pub data: ResponseData,
}

impl PlanResponse {
    /// Terminal failure when the location could not be resolved
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            ok: false,
            message: PLACE_NOT_FOUND_MESSAGE.to_string(),
            data: ResponseData::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_found_serializes_with_empty_data() {
        let json = serde_json::to_value(PlanResponse::not_found()).unwrap();
        assert_eq!(
            json,
            json!({"ok": false, "message": "I don't know this place exists.", "data": {}})
        );
    }

    #[test]
    fn test_lookup_states_stay_distinguishable() {
        let data = ResponseData {
            place: Some("Tokyo, Japan".to_string()),
            weather: Lookup::Failed,
            places: Lookup::Found(Vec::new()),
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json["weather"].is_null());
        assert_eq!(json["places"], json!([]));

        let data = ResponseData {
            place: Some("Tokyo, Japan".to_string()),
            weather: Lookup::NotRequested,
            places: Lookup::Failed,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("weather").is_none());
        assert!(json["places"].is_null());
    }

    #[test]
    fn test_lookup_deserializes_back_to_same_state() {
        let data: ResponseData =
            serde_json::from_value(json!({"place": "Kyoto", "places": null})).unwrap();
        assert_eq!(data.weather, Lookup::NotRequested);
        assert_eq!(data.places, Lookup::Failed);

        let data: ResponseData = serde_json::from_value(json!({"places": ["Kinkaku-ji"]})).unwrap();
        assert_eq!(data.places.as_found(), Some(&vec!["Kinkaku-ji".to_string()]));
    }

    #[test]
    fn test_lookup_from_option() {
        assert!(Lookup::<u8>::from(None).is_failed());
        assert_eq!(Lookup::from(Some(3)), Lookup::Found(3));
    }
}
