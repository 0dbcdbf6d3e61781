use std::collections::BTreeMap;

use tracing::trace;

use super::{GeoSearchEvent, Handler, HostMap, MarkerId, MarkerSpec};
use crate::{
    geo::{LatLng, LatLngBounds},
    view::ViewTarget,
};

/// A marker currently on a [`HeadlessMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub spec: MarkerSpec,
    pub popup_open: bool,
}

/// An in-memory [`HostMap`] without any rendering.
///
/// It keeps the handler table, the current view, the marker layer and every
/// event fired at it, which makes it suitable for embedding the control in a
/// non-graphical front end and for inspecting what the control did.
///
/// ```rust
/// use geosearch::{Handler, HeadlessMap, HostMap};
///
/// let mut map = HeadlessMap::new().without_handler(Handler::Keyboard);
/// assert_eq!(map.handler_enabled(Handler::Dragging), Some(true));
/// assert_eq!(map.handler_enabled(Handler::Keyboard), None);
///
/// map.disable_handler(Handler::Dragging);
/// assert_eq!(map.handler_enabled(Handler::Dragging), Some(false));
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    handlers: [Option<bool>; Handler::ALL.len()],
    center: LatLng,
    zoom: f64,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_marker: u64,
    events: Vec<GeoSearchEvent>,
    views: Vec<ViewTarget>,
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMap {
    /// A map at zoom 2 over (0, 0) with every handler present and enabled.
    pub fn new() -> Self {
        Self {
            handlers: [Some(true); Handler::ALL.len()],
            center: LatLng::default(),
            zoom: 2.0,
            markers: BTreeMap::new(),
            next_marker: 1,
            events: Vec::new(),
            views: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_view(mut self, center: LatLng, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }

    #[must_use]
    pub fn with_handler(mut self, handler: Handler, enabled: bool) -> Self {
        self.handlers[handler.index()] = Some(enabled);
        self
    }

    /// Remove the capability entirely, as on a map built without that handler.
    #[must_use]
    pub fn without_handler(mut self, handler: Handler) -> Self {
        self.handlers[handler.index()] = None;
        self
    }

    pub const fn center(&self) -> LatLng {
        self.center
    }

    pub fn markers(&self) -> impl Iterator<Item = (&MarkerId, &PlacedMarker)> {
        self.markers.iter()
    }

    pub fn marker(&self, id: MarkerId) -> Option<&PlacedMarker> {
        self.markers.get(&id)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn events(&self) -> &[GeoSearchEvent] {
        &self.events
    }

    /// View commands in the order they were issued.
    pub fn views(&self) -> &[ViewTarget] {
        &self.views
    }

    pub fn last_view(&self) -> Option<&ViewTarget> {
        self.views.last()
    }
}

impl HostMap for HeadlessMap {
    fn handler_enabled(&self, handler: Handler) -> Option<bool> {
        self.handlers[handler.index()]
    }

    fn enable_handler(&mut self, handler: Handler) {
        if let Some(enabled) = self.handlers[handler.index()].as_mut() {
            *enabled = true;
        }
    }

    fn disable_handler(&mut self, handler: Handler) {
        if let Some(enabled) = self.handlers[handler.index()].as_mut() {
            *enabled = false;
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_view(&mut self, center: LatLng, zoom: f64, animate: bool) {
        trace!(%center, zoom, animate, "set_view");
        self.center = center;
        self.zoom = zoom;
        self.views.push(ViewTarget::SetView {
            center,
            zoom,
            animate,
        });
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, animate: bool) {
        trace!(%bounds, animate, "fit_bounds");
        self.center = bounds.center();
        self.views.push(ViewTarget::FitBounds { bounds, animate });
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                spec,
                popup_open: false,
            },
        );
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.markers.remove(&id);
    }

    fn open_popup(&mut self, id: MarkerId) {
        if let Some(marker) = self.markers.get_mut(&id) {
            marker.popup_open = true;
        }
    }

    fn fire(&mut self, event: GeoSearchEvent) {
        trace!(event = event.name(), "fire");
        self.events.push(event);
    }
}
