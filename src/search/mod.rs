//! Address search state machine
//!
//! Tracks what the user typed, which geocode request is the freshest, and how
//! each response should change the map:
//!
//! ```text
//! Idle --input--> Debouncing --timer--> Resolving --fresh response--> Idle
//!                     ^                     |
//!                     +-------input---------+
//! ```
//!
//! Responses are matched against the most recently minted request id, so a
//! slow answer to an old query can never overwrite a newer one. The async
//! plumbing (timers, spawned lookups) lives in the viewport manager; this
//! module only decides.

pub mod debounce;

use crate::coord::Coordinate;
use crate::error::GeocodeError;
use crate::geo::GeoLocation;
use serde::Serialize;
use tracing::debug;

/// Where the search box currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Nothing to do
    #[default]
    Idle,
    /// Waiting for typing to settle
    Debouncing,
    /// A lookup for the latest text is in flight
    Resolving,
}

/// A single lookup handed to the geocoding backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub id: u64,
    pub address: String,
}

/// The error shown to the user, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchError {
    pub message: String,
    /// Whether retrying the same address may succeed
    pub retryable: bool,
}

/// What a new piece of text means for the search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Same text as before, nothing changes
    Unchanged,
    /// Empty or already resolved; any pending work is dropped
    Settled,
    /// New text; the debounce timer must be (re)armed with this ticket
    Debounce(u64),
}

/// How a response affects the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Superseded by a newer request, ignore it
    Stale,
    /// Center the map on the geocoded address
    Recenter(Coordinate),
    /// Nothing matched; fall back to the best known center quietly
    FallBack,
    /// A visible, retryable failure; the viewport stays where it is
    Failed,
}

/// Address search bookkeeping
#[derive(Debug, Default)]
pub struct SearchState {
    current_address: String,
    last_resolved: Option<String>,
    latest_id: u64,
    /// Bumped on every text change; a timer may only mint for its own
    generation: u64,
    phase: SearchPhase,
    error: Option<SearchError>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    /// Text most recently entered
    pub fn current_address(&self) -> &str {
        &self.current_address
    }

    /// Address the map was last successfully centered on
    pub fn last_resolved(&self) -> Option<&str> {
        self.last_resolved.as_deref()
    }

    /// Whether the user is searching for something
    pub fn is_active(&self) -> bool {
        !self.current_address.is_empty()
    }

    /// Record newly entered text
    pub fn input(&mut self, address: &str) -> InputOutcome {
        let address = address.trim();
        if address == self.current_address {
            return InputOutcome::Unchanged;
        }
        self.current_address = address.to_string();
        self.generation += 1;

        if address.is_empty() || self.last_resolved.as_deref() == Some(address) {
            self.supersede();
            return InputOutcome::Settled;
        }

        self.phase = SearchPhase::Debouncing;
        InputOutcome::Debounce(self.generation)
    }

    /// Mint a request for the current text once the debounce timer fires
    ///
    /// Refused unless `ticket` came from the latest text change and the text
    /// is still waiting to be looked up. A timer that fired while newer text
    /// was arriving therefore mints nothing.
    pub fn mint(&mut self, ticket: u64) -> Option<GeocodeRequest> {
        if ticket != self.generation || self.phase != SearchPhase::Debouncing {
            debug!(ticket, generation = self.generation, "Ignoring outdated debounce timer");
            return None;
        }
        self.issue()
    }

    /// Re-issue the current text after a retryable failure
    pub fn retry(&mut self) -> Option<GeocodeRequest> {
        match &self.error {
            Some(error) if error.retryable => self.issue(),
            _ => None,
        }
    }

    fn issue(&mut self) -> Option<GeocodeRequest> {
        if self.current_address.is_empty() {
            return None;
        }

        self.latest_id += 1;
        self.phase = SearchPhase::Resolving;
        Some(GeocodeRequest {
            id: self.latest_id,
            address: self.current_address.clone(),
        })
    }

    /// Make every request in flight stale and go idle
    pub fn supersede(&mut self) {
        self.latest_id += 1;
        self.phase = SearchPhase::Idle;
    }

    /// Whether a response to `id` may still be applied
    pub fn is_fresh(&self, id: u64) -> bool {
        id == self.latest_id
    }

    /// Apply a backend response to the search state
    pub fn resolve(
        &mut self,
        request: &GeocodeRequest,
        outcome: Result<GeoLocation, GeocodeError>,
    ) -> Resolution {
        if !self.is_fresh(request.id) {
            debug!(
                request = request.id,
                latest = self.latest_id,
                address = %request.address,
                "Discarding stale geocode response"
            );
            return Resolution::Stale;
        }

        self.phase = SearchPhase::Idle;

        let outcome = outcome.and_then(|location| {
            let coord = location.coordinate();
            if coord.is_valid() {
                Ok(coord)
            } else {
                Err(GeocodeError::NotFound)
            }
        });

        match outcome {
            Ok(coord) => {
                self.last_resolved = Some(request.address.clone());
                self.error = None;
                Resolution::Recenter(coord)
            }
            Err(e) if e.is_benign() => {
                self.error = None;
                Resolution::FallBack
            }
            Err(e) => {
                self.error = Some(SearchError {
                    message: e.to_string(),
                    retryable: true,
                });
                Resolution::Failed
            }
        }
    }

    /// Forget the search entirely
    pub fn reset(&mut self) {
        self.current_address.clear();
        self.generation += 1;
        self.last_resolved = None;
        self.error = None;
        self.supersede();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Type `address` and let the debounce timer fire
    fn lookup(search: &mut SearchState, address: &str) -> GeocodeRequest {
        let InputOutcome::Debounce(ticket) = search.input(address) else {
            panic!("expected {:?} to be debounced", address);
        };
        search.mint(ticket).unwrap()
    }

    fn found(lat: f64, lng: f64) -> Result<GeoLocation, GeocodeError> {
        Ok(GeoLocation::new(lat, lng, "somewhere"))
    }

    #[test]
    fn test_input_transitions() {
        let mut search = SearchState::new();
        assert_eq!(search.phase(), SearchPhase::Idle);

        assert!(matches!(search.input("Ayala"), InputOutcome::Debounce(_)));
        assert_eq!(search.phase(), SearchPhase::Debouncing);
        assert!(search.is_active());

        assert_eq!(search.input("Ayala"), InputOutcome::Unchanged);
        assert_eq!(search.input("  Ayala "), InputOutcome::Unchanged);

        assert_eq!(search.input(""), InputOutcome::Settled);
        assert_eq!(search.phase(), SearchPhase::Idle);
        assert!(!search.is_active());
    }

    #[test]
    fn test_mint_increments_ids() {
        let mut search = SearchState::new();
        let first = lookup(&mut search, "a");
        let second = lookup(&mut search, "ab");

        assert!(second.id > first.id);
        assert_eq!(second.address, "ab");
        assert_eq!(search.phase(), SearchPhase::Resolving);
        assert!(!search.is_fresh(first.id));
        assert!(search.is_fresh(second.id));
    }

    #[test]
    fn test_mint_without_pending_text() {
        let mut search = SearchState::new();
        assert!(search.mint(0).is_none());
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_outdated_timer_mints_nothing() {
        let mut search = SearchState::new();
        let InputOutcome::Debounce(old) = search.input("ab") else {
            panic!("expected debounce");
        };
        let InputOutcome::Debounce(new) = search.input("abc") else {
            panic!("expected debounce");
        };

        // The timer armed for "ab" fires late; only the "abc" timer may mint
        assert!(search.mint(old).is_none());
        assert_eq!(search.phase(), SearchPhase::Debouncing);
        let request = search.mint(new).unwrap();
        assert_eq!(request.address, "abc");
        assert!(search.mint(new).is_none());
    }

    #[test]
    fn test_timer_mints_nothing_after_settling() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "Ayala");
        search.resolve(&request, found(14.6, 121.0));

        let InputOutcome::Debounce(ticket) = search.input("Makati") else {
            panic!("expected debounce");
        };
        assert_eq!(search.input("Ayala"), InputOutcome::Settled);
        assert!(search.mint(ticket).is_none());
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut search = SearchState::new();
        let old = lookup(&mut search, "old");
        let new = lookup(&mut search, "new");

        assert_eq!(search.resolve(&new, found(14.6, 121.0)), Resolution::Recenter(Coordinate::new(14.6, 121.0)));
        assert_eq!(search.resolve(&old, found(10.3, 123.9)), Resolution::Stale);
        assert_eq!(search.last_resolved(), Some("new"));
    }

    #[test]
    fn test_success_memoizes_and_clears_error() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "down");
        search.resolve(&request, Err(GeocodeError::Transport("503".to_string())));
        assert!(search.error().is_some());

        let retry = search.retry().unwrap();
        assert_eq!(retry.address, "down");
        search.resolve(&retry, found(14.6, 121.0));
        assert!(search.error().is_none());
        assert_eq!(search.last_resolved(), Some("down"));

        // Typing the resolved text again is a no-op
        search.input("elsewhere");
        assert_eq!(search.input("down"), InputOutcome::Settled);
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_benign_failure_is_invisible() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "nowhere");

        assert_eq!(search.resolve(&request, Err(GeocodeError::NotFound)), Resolution::FallBack);
        assert!(search.error().is_none());
        assert!(search.last_resolved().is_none());
        assert!(search.retry().is_none());
    }

    #[test]
    fn test_invalid_coordinate_counts_as_not_found() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "null island");
        assert_eq!(search.resolve(&request, found(0.0, 0.0)), Resolution::FallBack);
    }

    #[test]
    fn test_transport_failure_is_visible() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "Ayala");

        let resolution =
            search.resolve(&request, Err(GeocodeError::Transport("connection refused".to_string())));
        assert_eq!(resolution, Resolution::Failed);

        let error = search.error().unwrap();
        assert!(error.retryable);
        assert!(error.message.contains("connection refused"));
        assert_eq!(search.phase(), SearchPhase::Idle);
    }

    #[test]
    fn test_settling_supersedes_in_flight() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "a");
        search.input("");

        assert_eq!(search.resolve(&request, found(14.6, 121.0)), Resolution::Stale);
    }

    #[test]
    fn test_reset() {
        let mut search = SearchState::new();
        let request = lookup(&mut search, "Ayala");
        search.resolve(&request, found(14.6, 121.0));

        search.reset();
        assert!(search.last_resolved().is_none());
        assert!(search.error().is_none());
        assert_eq!(search.current_address(), "");
        assert!(matches!(search.input("Ayala"), InputOutcome::Debounce(_)));
    }
}
