//! branch-locator: map engine for a branch directory
//!
//! Decides what a branch-locator map shows: where the viewport sits, which
//! branches are worth drawing, how they group into markers at the current
//! zoom, and how a typed address moves the map.
//!
//! ## Features
//!
//! - Viewport state from a fallback center, the device location, the branch
//!   centroid or a geocoded address
//! - Debounced address search where stale geocoder answers are discarded
//! - Nearest-subset selection and zoom-aware grid clustering
//! - Nominatim geocoding and IP geolocation
//! - CLI with text and JSON output
//!
//! ## Quick Start
//!
//! ```rust
//! use branch_locator::branches::Branch;
//! use branch_locator::cluster::{cluster_points, ClusterSettings};
//! use branch_locator::coord::{Coordinate, Region};
//!
//! let branches = vec![
//!     Branch::new("bgc", 14.5509, 121.0503),
//!     Branch::new("glorietta", 14.5512, 121.0510),
//!     Branch::new("cebu", 10.3181, 123.9050),
//! ];
//!
//! let viewport = Region::around(Coordinate::new(12.5, 122.5), 5.0);
//! let markers = cluster_points(&branches, &viewport, &ClusterSettings::default());
//! assert_eq!(markers.len(), 2);
//! ```

pub mod branches;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod search;
pub mod viewport;

// Re-export commonly used types
pub use branches::Branch;
pub use cluster::{ClusterMarker, ClusterSettings};
pub use config::Config;
pub use coord::{Coordinate, PointOfInterest, Region};
pub use error::{Error, GeocodeError, Result};
pub use viewport::{ManagerSettings, Snapshot, ViewportManager};
