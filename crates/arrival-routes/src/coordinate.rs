//! Coordinate and coordinate path types
//!
//! A [`CoordinatePath`] is the runtime shape of a route: an ordered list of
//! WGS84 points that is drawn as a polyline from start to end. On disk it is
//! a compact JSON array of `[lat, lon]` pairs.

use geo::{BoundingRect, LineString, Rect};
use serde::{Deserialize, Serialize};

/// Earth's mean radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single WGS84 position in degrees
///
/// Serialized as a two-element `[lat, lon]` array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Convert to a `geo` point (x = longitude, y = latitude)
    #[inline]
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }

    /// Great-circle distance to another coordinate in meters
    pub fn haversine_distance(self, other: Coordinate) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lon = (other.lon - self.lon).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lat, c.lon]
    }
}

impl From<geo::Point<f64>> for Coordinate {
    fn from(point: geo::Point<f64>) -> Self {
        Self {
            lat: point.y(),
            lon: point.x(),
        }
    }
}

/// Ordered sequence of coordinates describing a route's shape
///
/// Order is significant and duplicates are kept. An empty path means "nothing
/// to draw", either because it has not loaded yet or because loading failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinatePath(Vec<Coordinate>);

impl CoordinatePath {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> {
        self.0.iter()
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.0
    }

    /// Total length along the path in meters
    pub fn length_meters(&self) -> f64 {
        self.0
            .windows(2)
            .map(|pair| pair[0].haversine_distance(pair[1]))
            .sum()
    }

    /// Bounding box in WGS84 degrees (x = longitude, y = latitude)
    ///
    /// Returns `None` for an empty path.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        let line: LineString<f64> = self.0.iter().map(|c| (c.lon, c.lat)).collect();
        line.bounding_rect()
    }

    /// Center of the bounding box, if any
    pub fn center(&self) -> Option<Coordinate> {
        self.bounding_rect().map(|rect| {
            let center = rect.center();
            Coordinate::new(center.y, center.x)
        })
    }

    /// Serialize to the compact artifact form `[[lat,lon],...]`
    pub fn to_minified_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Vec<Coordinate>> for CoordinatePath {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

impl FromIterator<Coordinate> for CoordinatePath {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CoordinatePath {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
