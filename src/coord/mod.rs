//! Coordinates, map regions and points of interest
//!
//! This module handles:
//! - The coordinate type and its validity rules
//! - The visible map region (center plus spans)
//! - Great-circle distance and centroids
//! - Filtering raw point collections down to plausible ones

pub mod distance;
pub mod validate;

use crate::config::defaults::{DEFAULT_DELTA, DEFAULT_FALLBACK_LAT, DEFAULT_FALLBACK_LNG};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lon")]
    pub lng: f64,
}

impl Coordinate {
    /// Create new coordinates
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether this coordinate can be placed on the map
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    ///
    /// Exactly `(0, 0)` is the "unset" value upstream data uses for branches
    /// without a location, so it never counts as valid.
    pub fn is_valid(&self) -> bool {
        if self.lat.is_nan() || self.lng.is_nan() {
            return false;
        }
        if !(-90.0..=90.0).contains(&self.lat) || !(-180.0..=180.0).contains(&self.lng) {
            return false;
        }
        !(self.lat == 0.0 && self.lng == 0.0)
    }

    /// Validate the coordinate, describing what is wrong with it
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(crate::error::Error::InvalidCoordinates(format!(
                "({}, {}) is not a usable map coordinate",
                self.lat, self.lng
            )))
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// The visible map window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub center: Coordinate,
    /// Latitude span in degrees, always positive
    pub lat_delta: f64,
    /// Longitude span in degrees, always positive
    pub lng_delta: f64,
}

impl Region {
    /// Create a square region around a center
    pub fn around(center: Coordinate, delta: f64) -> Self {
        Self {
            center,
            lat_delta: delta,
            lng_delta: delta,
        }
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::around(
            Coordinate::new(DEFAULT_FALLBACK_LAT, DEFAULT_FALLBACK_LNG),
            DEFAULT_DELTA,
        )
    }
}

/// A record the map can place a marker for
///
/// Records are owned by whoever supplies them; the engine only reads the
/// identifier and coordinate.
pub trait PointOfInterest {
    /// Stable identifier, reused as the id of single-point markers
    fn id(&self) -> &str;

    /// Location of the record
    fn coordinate(&self) -> Coordinate;
}
