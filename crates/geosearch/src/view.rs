//! Recentering the map on a committed result.
//!
//! The target view degrades in a fixed order:
//!
//! 1. the result's own bounds, fitted (or centred at the current zoom when
//!    `retain_zoom_level` is set),
//! 2. the combined bounds of the placed markers, centred,
//! 3. the result's point at the configured zoom level.

use tracing::debug;

use crate::{
    config::Options,
    geo::{LatLng, LatLngBounds},
    map::HostMap,
    provider::SearchResult,
};

/// A view command issued to the host map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewTarget {
    FitBounds {
        bounds: LatLngBounds,
        animate: bool,
    },
    SetView {
        center: LatLng,
        zoom: f64,
        animate: bool,
    },
}

impl ViewTarget {
    /// Work out where the map should go for `result`.
    ///
    /// `marker_bounds` are the bounds of the markers currently on the map and
    /// are only consulted when the result has no usable bounds of its own.
    pub fn for_result(
        result: &SearchResult,
        marker_bounds: Option<LatLngBounds>,
        current_zoom: f64,
        options: &Options,
    ) -> Self {
        let animate = options.animate_zoom;
        let zoom = if options.retain_zoom_level {
            current_zoom
        } else {
            options.zoom_level
        };

        if let Some(bounds) = result.valid_bounds() {
            return if options.retain_zoom_level {
                Self::SetView {
                    center: bounds.center(),
                    zoom: current_zoom,
                    animate,
                }
            } else {
                Self::FitBounds { bounds, animate }
            };
        }

        let center = marker_bounds
            .filter(LatLngBounds::is_valid)
            .map_or_else(|| result.latlng(), |bounds| bounds.center());
        Self::SetView {
            center,
            zoom,
            animate,
        }
    }

    /// Issue the command to the host.
    pub fn apply(self, map: &mut impl HostMap) {
        match self {
            Self::FitBounds { bounds, animate } => map.fit_bounds(bounds, animate),
            Self::SetView {
                center,
                zoom,
                animate,
            } => map.set_view(center, zoom, animate),
        }
    }
}

/// Compute the view for `result` and move `map` there.
pub fn center_on(
    map: &mut impl HostMap,
    result: &SearchResult,
    marker_bounds: Option<LatLngBounds>,
    options: &Options,
) -> ViewTarget {
    let target = ViewTarget::for_result(result, marker_bounds, map.zoom(), options);
    debug!(?target, label = %result.label, "Centering map on result");
    target.apply(map);
    target
}
