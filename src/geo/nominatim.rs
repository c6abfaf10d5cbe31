//! Nominatim geocoding backend (OpenStreetMap)
//!
//! Uses the free Nominatim API for geocoding.
//! Rate limit: 1 request per second (enforced by User-Agent requirement)

use crate::config::GeocoderConfig;
use crate::error::{Error, GeocodeError, Result};
use crate::geo::{GeoBackend, GeoLocation};
use serde::Deserialize;
use tracing::debug;

/// Nominatim geocoding backend
#[derive(Debug, Clone)]
pub struct NominatimBackend {
    client: reqwest::Client,
    base_url: String,
}

/// Nominatim search response item
#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimBackend {
    /// Create a backend for a Nominatim-compatible service
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a backend from the `[geocoder]` config section
    pub fn from_config(config: &GeocoderConfig) -> Result<Self> {
        Self::new(config.url.as_str(), &config.user_agent)
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    /// Parse lat/lng strings to f64
    fn parse_coords(lat: &str, lng: &str) -> Result<(f64, f64)> {
        let lat: f64 = lat
            .parse()
            .map_err(|_| Error::Geo(format!("Invalid latitude: {}", lat)))?;
        let lng: f64 = lng
            .parse()
            .map_err(|_| Error::Geo(format!("Invalid longitude: {}", lng)))?;
        Ok((lat, lng))
    }

    /// Turn a decoded search response into the best match
    fn best_match(results: Vec<NominatimResult>) -> std::result::Result<GeoLocation, GeocodeError> {
        let result = results.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let (lat, lng) = Self::parse_coords(&result.lat, &result.lon)
            .map_err(|e| GeocodeError::Transport(e.to_string()))?;
        Ok(GeoLocation::new(lat, lng, result.display_name))
    }
}

impl GeoBackend for NominatimBackend {
    async fn geocode(&self, query: &str) -> std::result::Result<GeoLocation, GeocodeError> {
        let url = self.search_url(query);
        debug!(%url, "Querying Nominatim");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| GeocodeError::Transport(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Transport(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response.json().await.map_err(|e| {
            GeocodeError::Transport(format!("Failed to parse Nominatim response: {}", e))
        })?;

        Self::best_match(results)
    }
}
