//! Bounded set of markers placed for committed searches.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    config::Options,
    geo::{LatLng, LatLngBounds},
    map::{DragEndEvent, GeoSearchEvent, HostMap, MarkerId, MarkerSpec},
    provider::{SearchResult, Selection},
};

/// A marker owned by the set.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMarker {
    pub id: MarkerId,
    pub position: LatLng,
    pub draggable: bool,
    pub popup: String,
}

/// Markers in insertion order, never more than `max_markers` of them.
///
/// When full, adding evicts the oldest marker first. Eviction is purely by
/// insertion order.
#[derive(Debug)]
pub struct MarkerSet {
    markers: VecDeque<SearchMarker>,
    max_markers: usize,
}

impl MarkerSet {
    /// `max_markers` is clamped to at least one.
    pub fn new(max_markers: usize) -> Self {
        let max_markers = max_markers.max(1);
        Self {
            markers: VecDeque::with_capacity(max_markers),
            max_markers,
        }
    }

    pub const fn max_markers(&self) -> usize {
        self.max_markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &SearchMarker> {
        self.markers.iter()
    }

    pub fn contains(&self, id: MarkerId) -> bool {
        self.markers.iter().any(|marker| marker.id == id)
    }

    pub fn get(&self, id: MarkerId) -> Option<&SearchMarker> {
        self.markers.iter().find(|marker| marker.id == id)
    }

    /// Place a marker for `result`, evicting the oldest one if the set is full.
    pub fn add(
        &mut self,
        map: &mut impl HostMap,
        result: &SearchResult,
        selection: &Selection,
        options: &Options,
    ) -> MarkerId {
        while self.markers.len() >= self.max_markers {
            let Some(evicted) = self.markers.pop_front() else {
                break;
            };
            debug!(marker = %evicted.id, "Evicting oldest search marker");
            map.remove_marker(evicted.id);
        }

        let position = result.latlng();
        let popup = options.popup_label(&selection.query, result);
        let id = map.add_marker(MarkerSpec {
            position,
            icon: options.marker.icon.clone(),
            draggable: options.marker.draggable,
            title: Some(result.label.clone()),
            popup: popup.clone(),
        });
        if options.show_popup {
            map.open_popup(id);
        }
        trace!(marker = %id, %position, "Placed search marker");

        self.markers.push_back(SearchMarker {
            id,
            position,
            draggable: options.marker.draggable,
            popup,
        });
        id
    }

    /// Remove every marker from the map.
    pub fn clear(&mut self, map: &mut impl HostMap) {
        if !self.markers.is_empty() {
            debug!(count = self.markers.len(), "Clearing search markers");
        }
        for marker in self.markers.drain(..) {
            map.remove_marker(marker.id);
        }
    }

    /// Combined extent of all placed markers.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(self.markers.iter().map(|marker| marker.position))
    }

    /// Record a finished drag and re-emit it as `geosearch/marker/dragend`.
    ///
    /// Drags of markers this set does not own, or that are not draggable, are
    /// ignored and `false` is returned.
    pub fn drag_end(
        &mut self,
        map: &mut impl HostMap,
        location: LatLng,
        event: DragEndEvent,
    ) -> bool {
        let Some(marker) = self
            .markers
            .iter_mut()
            .find(|marker| marker.id == event.marker && marker.draggable)
        else {
            return false;
        };
        marker.position = location;
        map.fire(GeoSearchEvent::MarkerDragEnd { location, event });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map::HeadlessMap, test_support::NullProvider};

    fn options(max_markers: usize, draggable: bool, show_popup: bool) -> Options {
        Options::builder()
            .provider(NullProvider)
            .max_markers(max_markers)
            .draggable_markers(draggable)
            .show_popup(show_popup)
            .popup_format(|query, result| format!("{query}: {}", result.label))
            .build()
            .unwrap()
    }

    fn place(
        set: &mut MarkerSet,
        map: &mut HeadlessMap,
        options: &Options,
        label: &str,
        x: f64,
    ) -> MarkerId {
        let result = SearchResult::new(label, x, 10.0);
        set.add(map, &result, &Selection::query(label), options)
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let options = options(2, false, false);
        let mut map = HeadlessMap::new();
        let mut set = MarkerSet::new(options.max_markers);

        let first = place(&mut set, &mut map, &options, "a", 1.0);
        let second = place(&mut set, &mut map, &options, "b", 2.0);
        let third = place(&mut set, &mut map, &options, "c", 3.0);

        assert_eq!(set.len(), 2);
        assert!(!set.contains(first));
        assert!(set.contains(second) && set.contains(third));
        assert_eq!(map.marker_count(), 2);
        assert!(map.marker(first).is_none());
    }

    #[test]
    fn test_single_marker_replaced() {
        let options = options(1, false, false);
        let mut map = HeadlessMap::new();
        let mut set = MarkerSet::new(options.max_markers);

        place(&mut set, &mut map, &options, "a", 1.0);
        let latest = place(&mut set, &mut map, &options, "b", 2.0);

        assert_eq!(set.iter().map(|m| m.id).collect::<Vec<_>>(), [latest]);
        assert_eq!(map.marker_count(), 1);
    }

    #[test]
    fn test_popup_label_and_open() {
        let options = options(1, false, true);
        let mut map = HeadlessMap::new();
        let mut set = MarkerSet::new(options.max_markers);

        let id = place(&mut set, &mut map, &options, "Paris", 2.35);
        let placed = map.marker(id).unwrap();
        assert_eq!(placed.spec.popup, "Paris: Paris");
        assert_eq!(placed.spec.position, LatLng::new(10.0, 2.35));
        assert!(placed.popup_open);
    }

    #[test]
    fn test_bounds_and_clear() {
        let options = options(3, false, false);
        let mut map = HeadlessMap::new();
        let mut set = MarkerSet::new(options.max_markers);
        assert!(set.bounds().is_none());

        place(&mut set, &mut map, &options, "a", -5.0);
        place(&mut set, &mut map, &options, "b", 5.0);
        let bounds = set.bounds().unwrap();
        assert_eq!(bounds.center(), LatLng::new(10.0, 0.0));

        set.clear(&mut map);
        assert!(set.is_empty());
        assert_eq!(map.marker_count(), 0);
    }

    #[test]
    fn test_drag_end_only_for_draggable() {
        let mut map = HeadlessMap::new();
        let fixed_options = options(2, false, false);
        let mut fixed = MarkerSet::new(2);
        let id = place(&mut fixed, &mut map, &fixed_options, "a", 1.0);
        let event = DragEndEvent {
            marker: id,
            distance: 3.0,
        };
        assert!(!fixed.drag_end(&mut map, LatLng::new(0.0, 0.0), event));
        assert!(map.events().is_empty());

        let draggable_options = options(2, true, false);
        let mut draggable = MarkerSet::new(2);
        let id = place(&mut draggable, &mut map, &draggable_options, "b", 2.0);
        let moved = LatLng::new(11.0, 2.5);
        let event = DragEndEvent {
            marker: id,
            distance: 3.0,
        };
        assert!(draggable.drag_end(&mut map, moved, event));
        assert_eq!(draggable.get(id).unwrap().position, moved);
        assert_eq!(
            map.events(),
            [GeoSearchEvent::MarkerDragEnd {
                location: moved,
                event
            }]
        );
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(MarkerSet::new(0).max_markers(), 1);
    }
}
