//! Branch directory snapshots
//!
//! Branches come from the rental backend's branch directory as a JSON array.
//! A branch without a location deserializes to the `(0, 0)` coordinate and is
//! later dropped by the point validator.

use crate::coord::{Coordinate, PointOfInterest};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A rental branch shown on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    /// Stable branch identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Street address, if the directory has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, alias = "latitude")]
    pub lat: Option<f64>,

    #[serde(default, alias = "longitude", alias = "lon")]
    pub lng: Option<f64>,
}

impl Branch {
    /// Create a branch at a location, named after its id
    pub fn new(id: impl Into<String>, lat: f64, lng: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            address: None,
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Set the display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the street address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl PointOfInterest for Branch {
    fn id(&self) -> &str {
        &self.id
    }

    fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat.unwrap_or(0.0), self.lng.unwrap_or(0.0))
    }
}

/// Parse a branch directory from JSON text
pub fn parse_branches(json: &str) -> Result<Vec<Branch>> {
    serde_json::from_str(json)
        .map_err(|e| Error::Branches(format!("Failed to parse branch directory: {}", e)))
}

/// Load a branch directory snapshot from a JSON file
pub fn load_branches(path: impl AsRef<Path>) -> Result<Vec<Branch>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Branches(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_branches(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_branches() {
        let json = r#"[
            {"id": "bgc", "name": "BGC Hub", "lat": 14.5509, "lng": 121.0503},
            {"id": "cebu", "name": "Cebu IT Park", "latitude": 10.3307, "longitude": 123.9058},
            {"id": "pending", "name": "Opening soon"},
            {"id": "nulls", "lat": null, "lng": null}
        ]"#;

        let branches = parse_branches(json).unwrap();
        assert_eq!(branches.len(), 4);
        assert_eq!(branches[0].coordinate(), Coordinate::new(14.5509, 121.0503));
        assert_eq!(branches[1].coordinate(), Coordinate::new(10.3307, 123.9058));
        assert!(!branches[2].coordinate().is_valid());
        assert!(!branches[3].coordinate().is_valid());
        assert_eq!(branches[3].name, "");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_branches("{not json").is_err());
    }

    #[test]
    fn test_load_branches_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("branches.json");
        let branches = vec![
            Branch::new("a", 14.55, 121.02).with_name("Makati"),
            Branch::new("b", 14.60, 120.98).with_address("Ermita, Manila"),
        ];
        fs::write(&path, serde_json::to_string(&branches).unwrap()).unwrap();

        let loaded = load_branches(&path).unwrap();
        assert_eq!(loaded, branches);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_branches(temp_dir.path().join("missing.json")).is_err());
    }
}
