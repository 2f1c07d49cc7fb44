//! Nearby points of interest via the Overpass API

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, info, instrument, warn};

use crate::config::PlacesConfig;
use crate::http::{build_client, join_url, send_checked};
use crate::{ErrorCode, TourismError};

/// Radius and result cap for one nearby search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NearbySearch {
    pub radius_m: u32,
    pub limit: usize,
}

impl Default for NearbySearch {
    fn default() -> Self {
        Self {
            radius_m: 5000,
            limit: 5,
        }
    }
}

impl From<&PlacesConfig> for NearbySearch {
    fn from(config: &PlacesConfig) -> Self {
        Self {
            radius_m: config.radius_m,
            limit: config.limit,
        }
    }
}

/// Points-of-interest collaborator.
///
/// Returns unique names in provider order, at most `search.limit` of them.
/// An empty list is a successful search with nothing nearby.
#[async_trait]
pub trait PlacesLookup: Send + Sync {
    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        search: NearbySearch,
    ) -> Result<Vec<String>>;
}

/// Overpass interpreter client
pub struct OverpassClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl OverpassClient {
    /// Create a new client
    pub fn new(config: &PlacesConfig, user_agent: &str) -> Result<Self> {
        Ok(Self {
            client: build_client(&config.provider(), user_agent)?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl PlacesLookup for OverpassClient {
    #[instrument(skip(self))]
    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        search: NearbySearch,
    ) -> Result<Vec<String>> {
        info!(
            "Searching points of interest within {}m of ({:.4}, {:.4})",
            search.radius_m, latitude, longitude
        );

        let query = build_overpass_query(latitude, longitude, search.radius_m);
        let context = HashMap::from([
            (
                "coordinates".to_string(),
                format!("{latitude:.4},{longitude:.4}"),
            ),
            ("radius_m".to_string(), search.radius_m.to_string()),
        ]);

        let request = self
            .client
            .post(join_url(&self.base_url, "interpreter"))
            .body(query);
        let response = send_checked("Overpass", request, context.clone()).await?;

        let body: overpass::Response = response
            .json()
            .await
            .map_err(|e| {
                warn!("Failed to parse places response: {}", e);
                anyhow::Error::new(e).context(TourismError::api_with_context(
                    "Invalid places data received from Overpass",
                    ErrorCode::ApiInvalidResponse,
                    context,
                ))
            })?;

        let names = collect_names(body.elements, search.limit);
        debug!("Found {} named places: {:?}", names.len(), names);
        Ok(names)
    }
}

/// Overpass QL selecting tourism, cultural and green spaces around a point
#[must_use]
pub fn build_overpass_query(latitude: f64, longitude: f64, radius_m: u32) -> String {
    let around = format!("around:{radius_m},{latitude},{longitude}");
    format!(
        r#"[out:json][timeout:25];
(
  node({around})["tourism"];
  way({around})["tourism"];
  node({around})["amenity"~"museum|park|zoo|theatre"];
  way({around})["amenity"~"museum|park|zoo|theatre"];
  node({around})["leisure"~"park|garden"];
  way({around})["leisure"~"park|garden"];
);
out center;
"#
    )
}

fn collect_names(elements: Vec<overpass::Element>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for name in elements.into_iter().filter_map(|el| el.tags.name) {
        if names.len() >= limit {
            break;
        }
        if !name.trim().is_empty() && seen.insert(name.clone()) {
            names.push(name);
        }
    }
    names
}

/// Overpass wire format
mod overpass {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub elements: Vec<Element>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Element {
        #[serde(default)]
        pub tags: Tags,
    }

    #[derive(Debug, Default, Deserialize)]
    pub struct Tags {
        pub name: Option<String>,
    }
}
