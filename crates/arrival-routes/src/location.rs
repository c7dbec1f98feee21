//! Geolocation boundary
//!
//! A [`LocationProvider`] answers a single "where am I" request; there is no
//! continuous tracking. When the host has no location capability at all the
//! view-model is built without a provider and reports
//! [`GeolocationError::Unsupported`].

use crate::coordinate::Coordinate;
use crate::source::BoxFuture;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this platform")]
    Unsupported,

    #[error("location permission denied")]
    Denied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

pub trait LocationProvider: Send + Sync {
    fn current_position(&self) -> BoxFuture<Result<Coordinate, GeolocationError>>;
}

/// Provider that always answers with a configured position
#[derive(Clone, Copy, Debug)]
pub struct FixedLocation(pub Coordinate);

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> BoxFuture<Result<Coordinate, GeolocationError>> {
        let position = self.0;
        Box::pin(async move { Ok(position) })
    }
}

/// Parse a `lat,lon` string
pub fn parse_lat_lon(text: &str) -> Result<Coordinate, String> {
    let (lat, lon) = text
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{text}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{lat}': {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{lon}': {e}"))?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(format!("coordinate out of range: {lat},{lon}"));
    }
    Ok(Coordinate::new(lat, lon))
}
