//! Shared providers for the integration tests.
#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use geosearch::{LatLng, LatLngBounds, Provider, ProviderError, SearchResult, Selection};

pub fn setup_test_env() {
    let _ = geosearch::init_logging(tracing::Level::WARN);
}

/// A small in-memory gazetteer matching labels by case-insensitive prefix.
#[derive(Clone, Default)]
pub struct Gazetteer {
    places: Arc<Vec<SearchResult>>,
    latency: Duration,
    calls: Arc<AtomicUsize>,
}

impl Gazetteer {
    pub fn europe() -> Self {
        let paris_bounds = LatLngBounds::new(LatLng::new(48.815, 2.224), LatLng::new(48.902, 2.469));
        let places = vec![
            SearchResult::new("Paris, France", 2.3522, 48.8566).with_bounds(paris_bounds),
            SearchResult::new("Parma, Italy", 10.3279, 44.8015),
            SearchResult::new("Berlin, Germany", 13.4050, 52.5200),
            SearchResult::new("Bern, Switzerland", 7.4474, 46.9480),
            SearchResult::new("Lisbon, Portugal", -9.1393, 38.7223),
        ];
        Self {
            places: Arc::new(places),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for Gazetteer {
    async fn search(&self, selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        if let Some(data) = &selection.data {
            return Ok(vec![data.clone()]);
        }
        let needle = selection.query.to_lowercase();
        Ok(self
            .places
            .iter()
            .filter(|place| place.label.to_lowercase().starts_with(&needle))
            .cloned()
            .collect())
    }
}

/// Always fails, as an unreachable geocoding service would.
pub struct Offline;

#[async_trait]
impl Provider for Offline {
    async fn search(&self, _selection: &Selection) -> Result<Vec<SearchResult>, ProviderError> {
        Err(ProviderError::Other(anyhow::anyhow!("connection refused")))
    }
}
