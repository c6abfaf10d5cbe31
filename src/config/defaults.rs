//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Fallback map center latitude (Manila)
pub const DEFAULT_FALLBACK_LAT: f64 = 14.5995;

/// Fallback map center longitude (Manila)
pub const DEFAULT_FALLBACK_LNG: f64 = 120.9842;

/// Span of the default and device-location viewports, in degrees
pub const DEFAULT_DELTA: f64 = 0.05;

/// Span used when centering on the centroid of all branches
pub const DEFAULT_CENTROID_DELTA: f64 = 0.1;

/// Span used when centering on a geocoded address
pub const DEFAULT_RESULT_DELTA: f64 = 0.02;

/// Maximum number of branches handed to the clustering engine
pub const DEFAULT_MAX_VISIBLE: usize = 15;

/// Quiet period before an address is geocoded
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Text shown by the search box when nothing has been typed
pub const DEFAULT_PLACEHOLDER: &str = "Search for an address";

/// Above this zoom level every branch gets its own marker
pub const DEFAULT_MAX_CLUSTERED_ZOOM: i32 = 14;

/// Grid cell size at the reference zoom, in degrees
pub const DEFAULT_BASE_CELL_DEGREES: f64 = 0.2;

/// Zoom level at which the grid cell equals the base cell size
pub const DEFAULT_REFERENCE_ZOOM: i32 = 8;

/// User agent sent to the geocoding service
pub const DEFAULT_USER_AGENT: &str = "branch-locator/0.1.0";

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "branch-locator";
