//! Error types for branch-locator

use thiserror::Error;

/// Main error type for branch-locator operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Branch directory error: {0}")]
    Branches(String),

    #[error("Geo error: {0}")]
    Geo(String),
}

/// Result type alias for branch-locator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by a geocoding backend
///
/// `NotFound` means the address simply has no match and is absorbed silently
/// by the viewport manager. `Transport` covers everything else and is shown
/// to the user as a retryable error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeocodeError {
    #[error("Location unavailable for this address")]
    NotFound,

    #[error("Geocoding request failed: {0}")]
    Transport(String),
}

impl GeocodeError {
    /// Whether this failure should stay invisible to the user
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_error_classification() {
        assert!(GeocodeError::NotFound.is_benign());
        assert!(!GeocodeError::Transport("timeout".to_string()).is_benign());
    }

    #[test]
    fn test_error_messages() {
        let err = GeocodeError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "Geocoding request failed: connection reset");

        let err = Error::Config("bad key".to_string());
        assert_eq!(err.to_string(), "Configuration error: bad key");
    }
}
