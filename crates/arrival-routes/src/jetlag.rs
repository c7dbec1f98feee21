//! Jet-lag light exposure recommendation
//!
//! Compares the traveller's home UTC offset with the destination's and
//! suggests when to seek daylight for a run.

/// Destination UTC offset in hours (Amsterdam, standard time)
pub const DESTINATION_OFFSET: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    /// UTC offset in hours
    pub offset: f64,
}

pub static CITIES: [City; 20] = [
    City { name: "New York (EST)", offset: -5.0 },
    City { name: "Los Angeles (PST)", offset: -8.0 },
    City { name: "London (GMT)", offset: 0.0 },
    City { name: "Paris (CET)", offset: 1.0 },
    City { name: "Berlin (CET)", offset: 1.0 },
    City { name: "Tokyo (JST)", offset: 9.0 },
    City { name: "Sydney (AEDT)", offset: 11.0 },
    City { name: "Dubai (GST)", offset: 4.0 },
    City { name: "Singapore (SGT)", offset: 8.0 },
    City { name: "Hong Kong (HKT)", offset: 8.0 },
    City { name: "Cape Town (SAST)", offset: 2.0 },
    City { name: "Rio de Janeiro (BRT)", offset: -3.0 },
    City { name: "Chicago (CST)", offset: -6.0 },
    City { name: "San Francisco (PST)", offset: -8.0 },
    City { name: "Toronto (EST)", offset: -5.0 },
    City { name: "Vancouver (PST)", offset: -8.0 },
    City { name: "Seoul (KST)", offset: 9.0 },
    City { name: "Mumbai (IST)", offset: 5.5 },
    City { name: "Shanghai (CST)", offset: 8.0 },
    City { name: "Bangkok (ICT)", offset: 7.0 },
];

/// Index into [`CITIES`] selected by default (New York)
pub const DEFAULT_CITY: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelDirection {
    East,
    West,
    SameZone,
}

impl TravelDirection {
    pub fn from_offsets(home: f64, destination: f64) -> Self {
        if home < destination {
            Self::East
        } else if home > destination {
            Self::West
        } else {
            Self::SameZone
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recommendation {
    pub direction: TravelDirection,
    pub action: &'static str,
    pub reason: &'static str,
}

/// Recommendation for someone arriving from a zone at `home_offset`
pub fn recommend(home_offset: f64) -> Recommendation {
    let direction = TravelDirection::from_offsets(home_offset, DESTINATION_OFFSET);
    let (action, reason) = match direction {
        TravelDirection::East => (
            "Seek Morning Light (10am - 2pm)",
            "Traveling East effectively shortens your day. Exposure to morning light helps \
             advance your circadian rhythm to align with the new earlier time zone.",
        ),
        TravelDirection::West => (
            "Seek Afternoon Light (2pm - 6pm)",
            "Traveling West effectively lengthens your day. Exposure to afternoon light helps \
             delay your circadian rhythm to align with the new later time zone.",
        ),
        TravelDirection::SameZone => (
            "No major adjustment needed.",
            "You are in a similar time zone. Run whenever you feel energetic!",
        ),
    };
    Recommendation {
        direction,
        action,
        reason,
    }
}

/// Hours of shift between home and destination (positive = eastward)
pub fn time_difference(home_offset: f64) -> f64 {
    DESTINATION_OFFSET - home_offset
}
