//! Compiled-in route catalog
//!
//! The set of routes is closed: each [`RouteKey`] has exactly one
//! [`RouteDefinition`] and exactly one coordinate artifact produced at build
//! time.

use crate::coordinate::Coordinate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a predefined running route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKey {
    Sanctuary,
    City,
    River,
}

impl RouteKey {
    /// All keys, in display order
    pub const ALL: [RouteKey; 3] = [RouteKey::Sanctuary, RouteKey::City, RouteKey::River];

    /// Route shown when the map is first opened
    pub const DEFAULT: RouteKey = RouteKey::Sanctuary;

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sanctuary => "sanctuary",
            Self::City => "city",
            Self::River => "river",
        }
    }

    pub fn definition(self) -> &'static RouteDefinition {
        match self {
            Self::Sanctuary => &ROUTES[0],
            Self::City => &ROUTES[1],
            Self::River => &ROUTES[2],
        }
    }
}

impl Default for RouteKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown route '{0}' (expected one of: sanctuary, city, river)")]
pub struct UnknownRouteKey(pub String);

impl FromStr for RouteKey {
    type Err = UnknownRouteKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRouteKey(s.to_string()))
    }
}

/// Static description of a route
#[derive(Clone, Debug, PartialEq)]
pub struct RouteDefinition {
    pub key: RouteKey,
    /// Display label
    pub name: &'static str,
    /// Display color as `#RRGGBB`
    pub color: &'static str,
    /// Initial view center
    pub center: Coordinate,
    /// Initial zoom level
    pub zoom: u8,
    pub distance_label: &'static str,
    /// Location of the coordinate artifact, relative to the asset root
    pub data_file: &'static str,
}

impl RouteDefinition {
    /// Parse [`Self::color`] into RGB components
    pub fn rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(self.color).unwrap_or((255, 255, 255))
    }
}

/// Indexed in [`RouteKey::ALL`] order
pub static ROUTES: [RouteDefinition; 3] = [
    RouteDefinition {
        key: RouteKey::Sanctuary,
        name: "Park",
        color: "#FF9F1C",
        center: Coordinate::new(52.3580, 4.8686),
        zoom: 14,
        distance_label: "4.22km",
        data_file: "data/routes/sanctuary.json",
    },
    RouteDefinition {
        key: RouteKey::City,
        name: "City",
        color: "#FF00FF",
        center: Coordinate::new(52.3650, 4.8900),
        zoom: 13,
        distance_label: "8.5km",
        data_file: "data/routes/city.json",
    },
    RouteDefinition {
        key: RouteKey::River,
        name: "River",
        color: "#39FF14",
        center: Coordinate::new(52.3500, 4.9100),
        zoom: 13,
        distance_label: "10km",
        data_file: "data/routes/river.json",
    },
];

fn parse_hex_color(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
