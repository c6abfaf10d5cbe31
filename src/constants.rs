//! Constants shared across the branch-locator crate
//!
//! Tunable values live in `config::defaults`; these are fixed.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometres
    pub const EARTH_RADIUS_KM: f64 = 6371.0;

    /// Longitude span of the whole map, used to derive zoom levels
    pub const WORLD_DEGREES: f64 = 360.0;

    /// Deepest zoom level; degenerate spans map here
    pub const MAX_ZOOM: i32 = 21;
}

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Cache settings
pub mod cache {
    /// How long an IP location stays fresh, in seconds
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location.json";
}
