//! Geocoding and device location
//!
//! Provides the geocoding backend contract used by address search, a
//! Nominatim implementation of it, and IP geolocation as a stand-in for the
//! device position.

pub mod ip_location;
pub mod nominatim;

use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{GeocodeError, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A geocoded location result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lng: f64,
    /// Display name (address or description)
    pub display_name: String,
}

impl GeoLocation {
    pub fn new(lat: f64, lng: f64, display_name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            display_name: display_name.into(),
        }
    }

    /// The location as a map coordinate
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// Trait for geocoding backends
///
/// Implementations must tolerate several lookups running at once with
/// different queries.
pub trait GeoBackend: Send + Sync {
    /// Geocode free-text address to its best match
    ///
    /// Fails with `GeocodeError::NotFound` when nothing matches and
    /// `GeocodeError::Transport` for everything else.
    fn geocode(&self, query: &str) -> impl Future<Output = std::result::Result<GeoLocation, GeocodeError>> + Send;
}

/// Get the configured geocoding backend
pub fn get_geocoder(config: &Config) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::from_config(&config.geocoder)
}

/// Get the IP locator
pub fn get_ip_locator() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}
