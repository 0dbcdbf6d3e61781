//! The geocoding backend seam.
//!
//! The control never geocodes anything itself. It hands a [`Selection`] to a
//! [`Provider`] and consumes the ranked [`SearchResult`]s it returns, treating
//! the first element as the best match.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::geo::{LatLng, LatLngBounds};

/// A candidate location returned by a provider.
///
/// # Examples
///
/// ```rust
/// use geosearch::SearchResult;
///
/// let paris = SearchResult::new("Paris, France", 2.35, 48.85);
/// assert_eq!(paris.latlng().lat, 48.85);
/// assert!(paris.bounds.is_none());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Human readable description of the location
    pub label: String,
    /// Longitude
    pub x: f64,
    /// Latitude
    pub y: f64,
    /// Extent of the location, when the provider knows it
    pub bounds: Option<LatLngBounds>,
    /// The provider's original payload for this candidate
    pub raw: serde_json::Value,
}

impl SearchResult {
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
            bounds: None,
            raw: serde_json::Value::Null,
        }
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: LatLngBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw = raw;
        self
    }

    pub const fn latlng(&self) -> LatLng {
        LatLng::new(self.y, self.x)
    }

    /// The result's bounds, if present and usable.
    pub fn valid_bounds(&self) -> Option<LatLngBounds> {
        self.bounds.filter(LatLngBounds::is_valid)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.latlng())
    }
}

/// What the user committed: the query text plus, optionally, the candidate it came from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    pub query: String,
    pub data: Option<SearchResult>,
}

impl Selection {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            data: None,
        }
    }

    pub fn with_data(query: impl Into<String>, data: SearchResult) -> Self {
        Self {
            query: query.into(),
            data: Some(data),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Malformed response: {0}")]
    Response(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A pluggable geocoding backend.
///
/// Calls may overlap: the control issues a new search while earlier ones are
/// still in flight and discards whichever responses are stale. Implementations
/// therefore must not rely on being polled to completion.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Search for candidates matching `selection.query`, best match first.
    async fn search(&self, selection: &Selection) -> Result<Vec<SearchResult>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bounds_filters_inverted() {
        let inverted = SearchResult::new("Nowhere", 0.0, 0.0).with_bounds(LatLngBounds::new(
            LatLng::new(1.0, 1.0),
            LatLng::new(0.0, 0.0),
        ));
        assert!(inverted.bounds.is_some());
        assert!(inverted.valid_bounds().is_none());
    }

    #[test]
    fn test_latlng_swaps_axes() {
        let result = SearchResult::new("Paris, France", 2.35, 48.85);
        assert_eq!(result.latlng(), LatLng::new(48.85, 2.35));
    }

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::Request("timeout".into());
        assert_eq!(err.to_string(), "Request failed: timeout");
    }
}
