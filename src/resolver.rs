//! Place resolution
//!
//! Turns a place name into coordinates plus a canonical display name. Every
//! failure (no name, no match, transport or parse error) collapses to `None`.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::extractor::Extractor;
use crate::geocoding::{PlaceQuery, PlaceSearch};
use crate::models::ResolvedLocation;

/// Service for resolving place names
#[derive(Clone)]
pub struct PlaceResolver {
    search: Arc<dyn PlaceSearch>,
    extractor: Extractor,
}

impl PlaceResolver {
    pub fn new(search: Arc<dyn PlaceSearch>, extractor: Extractor) -> Self {
        Self { search, extractor }
    }

    /// Extract a place name from raw text and resolve it
    pub async fn resolve(&self, text: &str) -> Option<ResolvedLocation> {
        let place = self.extractor.extract_place(text)?;
        self.resolve_place(&place).await
    }

    /// Resolve an already extracted place name via a single best-match search
    #[instrument(skip(self))]
    pub async fn resolve_place(&self, name: &str) -> Option<ResolvedLocation> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let matches = match self.search.search(&PlaceQuery::best_match(name)).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Geocoding failed for '{}': {:#}", name, e);
                return None;
            }
        };

        let Some(best) = matches.into_iter().next() else {
            debug!("No geocoding match for '{}'", name);
            return None;
        };

        let location = ResolvedLocation::new(
            best.latitude,
            best.longitude,
            best.display_name.unwrap_or_else(|| name.to_string()),
        );
        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_name, location.latitude, location.longitude
        );
        Some(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::PlaceMatch;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSearch {
        result: Option<Vec<PlaceMatch>>,
        queries: Mutex<Vec<(String, u8)>>,
    }

    #[async_trait]
    impl PlaceSearch for FakeSearch {
        async fn search(&self, query: &PlaceQuery<'_>) -> Result<Vec<PlaceMatch>> {
            self.queries
                .lock()
                .unwrap()
                .push((query.text.to_string(), query.limit));
            self.result.clone().ok_or_else(|| anyhow!("connection reset"))
        }
    }

    fn paris() -> PlaceMatch {
        PlaceMatch {
            latitude: 48.8589,
            longitude: 2.3200,
            display_name: Some("Paris, Île-de-France, France".to_string()),
        }
    }

    fn resolver(search: Arc<FakeSearch>) -> PlaceResolver {
        PlaceResolver::new(search, Extractor::default())
    }

    #[tokio::test]
    async fn test_resolve_extracts_then_searches_once() {
        let search = Arc::new(FakeSearch {
            result: Some(vec![paris()]),
            ..FakeSearch::default()
        });
        let location = resolver(search.clone())
            .resolve("weather in Paris")
            .await
            .unwrap();

        assert_eq!(location.latitude, 48.8589);
        assert_eq!(location.display_name, "Paris, Île-de-France, France");
        assert_eq!(
            *search.queries.lock().unwrap(),
            vec![("Paris".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_missing_name_short_circuits() {
        let search = Arc::new(FakeSearch {
            result: Some(vec![paris()]),
            ..FakeSearch::default()
        });
        let resolver = resolver(search.clone());

        assert!(resolver.resolve("xyzzy randomtext").await.is_none());
        assert!(resolver.resolve_place("   ").await.is_none());
        assert!(search.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_and_transport_error_are_both_unresolved() {
        let empty = Arc::new(FakeSearch {
            result: Some(Vec::new()),
            ..FakeSearch::default()
        });
        assert!(resolver(empty).resolve_place("Atlantis").await.is_none());

        let failing = Arc::new(FakeSearch::default());
        assert!(resolver(failing).resolve_place("Paris").await.is_none());
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_extracted_name() {
        let search = Arc::new(FakeSearch {
            result: Some(vec![PlaceMatch {
                display_name: None,
                ..paris()
            }]),
            ..FakeSearch::default()
        });
        let location = resolver(search).resolve_place("Paris").await.unwrap();
        assert_eq!(location.display_name, "Paris");
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let search = Arc::new(FakeSearch {
            result: Some(vec![paris()]),
            ..FakeSearch::default()
        });
        let resolver = resolver(search);
        let first = resolver.resolve("trip to Paris").await;
        let second = resolver.resolve("trip to Paris").await;
        assert_eq!(first, second);
    }
}
