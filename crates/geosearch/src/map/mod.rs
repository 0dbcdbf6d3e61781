//! The host map seam.
//!
//! The control drives whatever map it is attached to through [`HostMap`]: gesture
//! handler toggles, view commands, marker layers and event emission. Rendering,
//! projection and tiles stay on the host's side of this trait.

use std::fmt;

use crate::{
    geo::{LatLng, LatLngBounds},
    provider::SearchResult,
};

mod headless;

pub use headless::{HeadlessMap, PlacedMarker};

/// The gesture handlers the control suspends while the pointer is over its form.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Handler {
    Dragging,
    TouchZoom,
    DoubleClickZoom,
    ScrollWheelZoom,
    BoxZoom,
    Keyboard,
}

impl Handler {
    pub const ALL: [Self; 6] = [
        Self::Dragging,
        Self::TouchZoom,
        Self::DoubleClickZoom,
        Self::ScrollWheelZoom,
        Self::BoxZoom,
        Self::Keyboard,
    ];

    /// Position of the handler in [`Handler::ALL`], for table lookups.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The handler's property name on a Leaflet-style map object.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dragging => "dragging",
            Self::TouchZoom => "touchZoom",
            Self::DoubleClickZoom => "doubleClickZoom",
            Self::ScrollWheelZoom => "scrollWheelZoom",
            Self::BoxZoom => "boxZoom",
            Self::Keyboard => "keyboard",
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Host-assigned identity of a placed marker.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker#{}", self.0)
    }
}

/// Everything the host needs to create a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub icon: Option<String>,
    pub draggable: bool,
    pub title: Option<String>,
    /// Label of the popup bound to the marker
    pub popup: String,
}

/// Payload the host reports when the user finishes dragging a marker.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEndEvent {
    pub marker: MarkerId,
    /// Pixel distance the marker travelled
    pub distance: f64,
}

/// Domain events the control fires on the host map.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoSearchEvent {
    /// A committed search was placed on the map.
    ShowLocation {
        location: SearchResult,
        marker: Option<MarkerId>,
    },
    /// A draggable search marker was moved.
    MarkerDragEnd {
        location: LatLng,
        event: DragEndEvent,
    },
}

impl GeoSearchEvent {
    pub const SHOW_LOCATION: &'static str = "geosearch/showlocation";
    pub const MARKER_DRAGEND: &'static str = "geosearch/marker/dragend";

    pub const fn name(&self) -> &'static str {
        match self {
            Self::ShowLocation { .. } => Self::SHOW_LOCATION,
            Self::MarkerDragEnd { .. } => Self::MARKER_DRAGEND,
        }
    }
}

/// Capabilities the control needs from the map it is attached to.
///
/// [`HostMap::handler_enabled`] returns `None` for handlers the host does not
/// have; the control skips those rather than treating them as errors.
pub trait HostMap {
    fn handler_enabled(&self, handler: Handler) -> Option<bool>;
    fn enable_handler(&mut self, handler: Handler);
    fn disable_handler(&mut self, handler: Handler);

    /// Current zoom level.
    fn zoom(&self) -> f64;
    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool);
    fn fit_bounds(&mut self, bounds: LatLngBounds, animate: bool);

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn open_popup(&mut self, id: MarkerId);

    fn fire(&mut self, event: GeoSearchEvent);
}

impl<T: HostMap + ?Sized> HostMap for &mut T {
    fn handler_enabled(&self, handler: Handler) -> Option<bool> {
        (**self).handler_enabled(handler)
    }

    fn enable_handler(&mut self, handler: Handler) {
        (**self).enable_handler(handler);
    }

    fn disable_handler(&mut self, handler: Handler) {
        (**self).disable_handler(handler);
    }

    fn zoom(&self) -> f64 {
        (**self).zoom()
    }

    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) {
        (**self).set_view(center, zoom, animate);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, animate: bool) {
        (**self).fit_bounds(bounds, animate);
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        (**self).add_marker(spec)
    }

    fn remove_marker(&mut self, id: MarkerId) {
        (**self).remove_marker(id);
    }

    fn open_popup(&mut self, id: MarkerId) {
        (**self).open_popup(id);
    }

    fn fire(&mut self, event: GeoSearchEvent) {
        (**self).fire(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_table_order() {
        for (i, handler) in Handler::ALL.iter().enumerate() {
            assert_eq!(handler.index(), i);
        }
        assert_eq!(Handler::ScrollWheelZoom.to_string(), "scrollWheelZoom");
    }

    #[test]
    fn test_event_names() {
        let show = GeoSearchEvent::ShowLocation {
            location: SearchResult::new("Paris", 2.35, 48.85),
            marker: None,
        };
        assert_eq!(show.name(), "geosearch/showlocation");

        let drag = GeoSearchEvent::MarkerDragEnd {
            location: LatLng::new(0.0, 0.0),
            event: DragEndEvent {
                marker: MarkerId(1),
                distance: 12.0,
            },
        };
        assert_eq!(drag.name(), "geosearch/marker/dragend");
    }
}
