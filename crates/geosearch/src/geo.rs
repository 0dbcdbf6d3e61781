//! Geographic primitives shared by the control and the host map.
//!
//! Coordinates follow the usual map convention of latitude first. Providers,
//! however, report `x` (longitude) and `y` (latitude), so conversions happen
//! at the [`SearchResult`](crate::SearchResult) boundary.

use std::fmt;

/// A point on the map in decimal degrees.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLng {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// An axis-aligned bounding box described by its south-west and north-east corners.
///
/// Bounds coming from providers are not trusted: use [`LatLngBounds::is_valid`]
/// before fitting the view to them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Degenerate bounds covering a single point.
    pub const fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_point(first), |mut bounds, point| {
            bounds.extend(point);
            bounds
        }))
    }

    /// Grow the bounds to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Both corners are finite and ordered south-west to north-east.
    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

impl fmt::Display for LatLngBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} .. {}]", self.south_west, self.north_east)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_covers_all() {
        let bounds = LatLngBounds::from_points([
            LatLng::new(48.85, 2.35),
            LatLng::new(51.5, -0.12),
            LatLng::new(40.4, -3.7),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(40.4, -3.7));
        assert_eq!(bounds.north_east, LatLng::new(51.5, 2.35));
        assert!(bounds.is_valid());
        assert!(bounds.contains(LatLng::new(48.85, 2.35)));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(LatLngBounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_invalid_bounds() {
        let inverted = LatLngBounds::new(LatLng::new(10.0, 10.0), LatLng::new(0.0, 0.0));
        assert!(!inverted.is_valid());

        let nan = LatLngBounds::new(LatLng::new(f64::NAN, 0.0), LatLng::new(1.0, 1.0));
        assert!(!nan.is_valid());
    }

    #[test]
    fn test_center() {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 20.0));
        assert_eq!(bounds.center(), LatLng::new(5.0, 10.0));

        let point = LatLngBounds::from_point(LatLng::new(48.85, 2.35));
        assert!(point.is_valid());
        assert_eq!(point.center(), LatLng::new(48.85, 2.35));
    }
}
