//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/branch-locator/config.toml

pub mod defaults;

use crate::cluster::ClusterSettings;
use crate::constants::api::NOMINATIM_URL;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Map viewport settings
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Address search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Marker clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,

    /// Device location settings
    #[serde(default)]
    pub location: LocationConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Map viewport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Latitude shown before anything better is known
    #[serde(default = "default_fallback_lat")]
    pub fallback_lat: f64,

    /// Longitude shown before anything better is known
    #[serde(default = "default_fallback_lng")]
    pub fallback_lng: f64,

    /// Span of the fallback and device-location viewports
    #[serde(default = "default_delta")]
    pub default_delta: f64,

    /// Span used when centering on the branch centroid
    #[serde(default = "default_centroid_delta")]
    pub centroid_delta: f64,

    /// Maximum number of branches drawn at once
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

/// Address search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Debounce interval in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Span used when centering on a geocoded address
    #[serde(default = "default_result_delta")]
    pub result_delta: f64,

    /// Placeholder text that means "no address entered"
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

/// Marker clustering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Zoom level above which clustering is disabled
    #[serde(default = "default_max_clustered_zoom")]
    pub max_clustered_zoom: i32,

    /// Grid cell size at the reference zoom, in degrees
    #[serde(default = "default_base_cell_degrees")]
    pub base_cell_degrees: f64,

    /// Reference zoom level for the base cell size
    #[serde(default = "default_reference_zoom")]
    pub reference_zoom: i32,
}

/// Geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    /// Base URL of the Nominatim-compatible service
    #[serde(default = "default_geocoder_url")]
    pub url: String,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Device location settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// If true, IP geolocation stands in for the device location
    #[serde(default)]
    pub use_ip: bool,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_fallback_lat() -> f64 {
    DEFAULT_FALLBACK_LAT
}
fn default_fallback_lng() -> f64 {
    DEFAULT_FALLBACK_LNG
}
fn default_delta() -> f64 {
    DEFAULT_DELTA
}
fn default_centroid_delta() -> f64 {
    DEFAULT_CENTROID_DELTA
}
fn default_max_visible() -> usize {
    DEFAULT_MAX_VISIBLE
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}
fn default_result_delta() -> f64 {
    DEFAULT_RESULT_DELTA
}
fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}
fn default_max_clustered_zoom() -> i32 {
    DEFAULT_MAX_CLUSTERED_ZOOM
}
fn default_base_cell_degrees() -> f64 {
    DEFAULT_BASE_CELL_DEGREES
}
fn default_reference_zoom() -> i32 {
    DEFAULT_REFERENCE_ZOOM
}
fn default_geocoder_url() -> String {
    NOMINATIM_URL.to_string()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            fallback_lat: default_fallback_lat(),
            fallback_lng: default_fallback_lng(),
            default_delta: default_delta(),
            centroid_delta: default_centroid_delta(),
            max_visible: default_max_visible(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_delta: default_result_delta(),
            placeholder: default_placeholder(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_clustered_zoom: default_max_clustered_zoom(),
            base_cell_degrees: default_base_cell_degrees(),
            reference_zoom: default_reference_zoom(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            url: default_geocoder_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl ViewportConfig {
    /// The configured fallback center
    pub fn fallback_center(&self) -> Coordinate {
        Coordinate::new(self.fallback_lat, self.fallback_lng)
    }
}

impl From<&ClusteringConfig> for ClusterSettings {
    fn from(config: &ClusteringConfig) -> Self {
        Self {
            max_clustered_zoom: config.max_clustered_zoom,
            base_cell_degrees: config.base_cell_degrees,
            reference_zoom: config.reference_zoom,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            let config: Config = toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reject values the viewport manager cannot work with
    ///
    /// The fallback center must be a valid coordinate and every span must be
    /// strictly positive, otherwise the viewport could become invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.viewport.fallback_center().is_valid() {
            return Err(Error::Config(format!(
                "Fallback center ({}, {}) is not a valid coordinate",
                self.viewport.fallback_lat, self.viewport.fallback_lng
            )));
        }

        let deltas = [
            ("viewport.default_delta", self.viewport.default_delta),
            ("viewport.centroid_delta", self.viewport.centroid_delta),
            ("search.result_delta", self.search.result_delta),
            ("clustering.base_cell_degrees", self.clustering.base_cell_degrees),
        ];
        for (key, value) in deltas {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::Config(format!("{} must be positive, got {}", key, value)));
            }
        }

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["viewport", "fallback_lat"] => Some(self.viewport.fallback_lat.to_string()),
            ["viewport", "fallback_lng"] => Some(self.viewport.fallback_lng.to_string()),
            ["viewport", "default_delta"] => Some(self.viewport.default_delta.to_string()),
            ["viewport", "centroid_delta"] => Some(self.viewport.centroid_delta.to_string()),
            ["viewport", "max_visible"] => Some(self.viewport.max_visible.to_string()),

            ["search", "debounce_ms"] => Some(self.search.debounce_ms.to_string()),
            ["search", "result_delta"] => Some(self.search.result_delta.to_string()),
            ["search", "placeholder"] => Some(self.search.placeholder.clone()),

            ["clustering", "max_clustered_zoom"] => {
                Some(self.clustering.max_clustered_zoom.to_string())
            }
            ["clustering", "base_cell_degrees"] => {
                Some(self.clustering.base_cell_degrees.to_string())
            }
            ["clustering", "reference_zoom"] => Some(self.clustering.reference_zoom.to_string()),

            ["geocoder", "url"] => Some(self.geocoder.url.clone()),
            ["geocoder", "user_agent"] => Some(self.geocoder.user_agent.clone()),

            ["location", "use_ip"] => Some(self.location.use_ip.to_string()),

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["viewport", "fallback_lat"] => {
                self.viewport.fallback_lat = parse_value(key, value)?;
            }
            ["viewport", "fallback_lng"] => {
                self.viewport.fallback_lng = parse_value(key, value)?;
            }
            ["viewport", "default_delta"] => {
                self.viewport.default_delta = parse_value(key, value)?;
            }
            ["viewport", "centroid_delta"] => {
                self.viewport.centroid_delta = parse_value(key, value)?;
            }
            ["viewport", "max_visible"] => {
                self.viewport.max_visible = parse_value(key, value)?;
            }

            ["search", "debounce_ms"] => {
                self.search.debounce_ms = parse_value(key, value)?;
            }
            ["search", "result_delta"] => {
                self.search.result_delta = parse_value(key, value)?;
            }
            ["search", "placeholder"] => {
                self.search.placeholder = value.to_string();
            }

            ["clustering", "max_clustered_zoom"] => {
                self.clustering.max_clustered_zoom = parse_value(key, value)?;
            }
            ["clustering", "base_cell_degrees"] => {
                self.clustering.base_cell_degrees = parse_value(key, value)?;
            }
            ["clustering", "reference_zoom"] => {
                self.clustering.reference_zoom = parse_value(key, value)?;
            }

            ["geocoder", "url"] => {
                self.geocoder.url = value.to_string();
            }
            ["geocoder", "user_agent"] => {
                self.geocoder.user_agent = value.to_string();
            }

            ["location", "use_ip"] => {
                self.location.use_ip = parse_value(key, value)?;
            }

            ["output", "format"] => {
                self.output.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        self.validate()
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "viewport.fallback_lat",
            "viewport.fallback_lng",
            "viewport.default_delta",
            "viewport.centroid_delta",
            "viewport.max_visible",
            "search.debounce_ms",
            "search.result_delta",
            "search.placeholder",
            "clustering.max_clustered_zoom",
            "clustering.base_cell_degrees",
            "clustering.reference_zoom",
            "geocoder.url",
            "geocoder.user_agent",
            "location.use_ip",
            "output.format",
        ]
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
