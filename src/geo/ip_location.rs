//! IP-based geolocation
//!
//! Stands in for the device position when the host has no GPS. Lookups go
//! to ip-api.com and the answer is cached on disk for an hour.

use crate::config::defaults::APP_DIR_NAME;
use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::GeoLocation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, warn};

/// Resolves the host's approximate position from its public IP
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedLocation {
    location: GeoLocation,
    timestamp: u64,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl IpLocator {
    /// Locator caching under the user cache directory
    pub fn new() -> Self {
        Self::with_cache(dirs::cache_dir().map(|p| p.join(APP_DIR_NAME).join(IP_LOCATION_CACHE_FILE)))
    }

    /// Locator caching at `cache_path`, or not at all
    pub fn with_cache(cache_path: Option<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path,
        }
    }

    /// Current location, from cache when fresh
    pub async fn locate(&self) -> Result<GeoLocation> {
        if let Some(cached) = self.cached() {
            debug!(name = %cached.display_name, "Using cached IP location");
            return Ok(cached);
        }

        let location = self.fetch().await?;
        self.store(&location);
        Ok(location)
    }

    /// Best-effort device position
    ///
    /// Lookup failures and unusable coordinates both yield `None`, the same
    /// as a denied location permission.
    pub async fn device_location(&self) -> Option<Coordinate> {
        match self.locate().await {
            Ok(location) if location.coordinate().is_valid() => Some(location.coordinate()),
            Ok(location) => {
                warn!(lat = location.lat, lng = location.lng, "IP location is not usable");
                None
            }
            Err(e) => {
                warn!(error = %e, "IP location unavailable");
                None
            }
        }
    }

    async fn fetch(&self) -> Result<GeoLocation> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("Failed to parse IP location response: {}", e)))?;

        Self::into_location(data)
    }

    fn into_location(data: IpApiResponse) -> Result<GeoLocation> {
        if data.status != "success" {
            return Err(Error::Geo("IP location lookup failed".to_string()));
        }

        let (Some(lat), Some(lng)) = (data.lat, data.lon) else {
            return Err(Error::Geo("IP location response has no coordinates".to_string()));
        };

        let name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(GeoLocation::new(
            lat,
            lng,
            if name.is_empty() { "Unknown Location".to_string() } else { name },
        ))
    }

    fn cached(&self) -> Option<GeoLocation> {
        let content = fs::read_to_string(self.cache_path.as_ref()?).ok()?;
        let cached: CachedLocation = serde_json::from_str(&content).ok()?;

        (unix_now().saturating_sub(cached.timestamp) < IP_LOCATION_TTL_SECS)
            .then_some(cached.location)
    }

    /// Write-through; a cache that cannot be written is skipped
    fn store(&self, location: &GeoLocation) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedLocation {
            location: location.clone(),
            timestamp: unix_now(),
        };
        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            if let Err(e) = fs::write(cache_path, content) {
                debug!(error = %e, "Could not write IP location cache");
            }
        }
    }
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}
