//! Output formatters
//!
//! Provides trait-based output formatting for map views.

pub mod json;
pub mod text;

use crate::branches::Branch;
use crate::cluster::{zoom_for_delta, ClusterMarker};
use crate::error::Result;
use crate::viewport::Snapshot;
use serde::{Deserialize, Serialize};

/// Everything the CLI prints about the map
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    /// Zoom level derived from the viewport span
    pub zoom: i32,
    pub markers: Vec<ClusterMarker<Branch>>,
}

impl MapView {
    pub fn new(snapshot: Snapshot, markers: Vec<ClusterMarker<Branch>>) -> Self {
        Self {
            zoom: zoom_for_delta(snapshot.viewport.lat_delta),
            snapshot,
            markers,
        }
    }
}

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait ViewFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a map view
    fn format(&self, view: &MapView) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn ViewFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn ViewFormatter,
        &text::TextFormatter,
    ]
    .into_iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}
