//! Viewport state manager
//!
//! Owns the authoritative map region and wires the pieces together: point
//! validation, nearest-subset selection, clustering and debounced address
//! search. Every change is published as an immutable [`Snapshot`] on a watch
//! channel, so readers never observe a half-applied update.
//!
//! The manager spawns tokio tasks for debounce timers and geocode lookups and
//! must therefore be driven from within a tokio runtime. Dropping it (or
//! calling [`ViewportManager::shutdown`]) cancels the pending timer and turns
//! every in-flight lookup into a no-op.

pub mod visible;

pub use visible::visible_points;

use crate::cluster::{cluster_points, ClusterMarker, ClusterSettings};
use crate::config::Config;
use crate::coord::distance::centroid;
use crate::coord::validate::filter_valid;
use crate::coord::{Coordinate, PointOfInterest, Region};
use crate::geo::GeoBackend;
use crate::search::debounce::Debouncer;
use crate::search::{
    GeocodeRequest, InputOutcome, Resolution, SearchError, SearchPhase, SearchState,
};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Tunables for the viewport manager
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSettings {
    /// Region shown before anything better is known
    pub fallback: Region,
    /// Span used when centering on a device location
    pub default_delta: f64,
    /// Span used when centering on the branch centroid
    pub centroid_delta: f64,
    /// Span used when centering on a geocoded address
    pub result_delta: f64,
    /// Quiet period before an address is geocoded
    pub debounce: Duration,
    /// Search box text that means "no address entered"
    pub placeholder: String,
    /// Maximum number of points handed to the clustering engine
    pub max_visible: usize,
    pub cluster: ClusterSettings,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ManagerSettings {
    fn from(config: &Config) -> Self {
        Self {
            fallback: Region::around(
                config.viewport.fallback_center(),
                config.viewport.default_delta,
            ),
            default_delta: config.viewport.default_delta,
            centroid_delta: config.viewport.centroid_delta,
            result_delta: config.search.result_delta,
            debounce: Duration::from_millis(config.search.debounce_ms),
            placeholder: config.search.placeholder.clone(),
            max_visible: config.viewport.max_visible,
            cluster: ClusterSettings::from(&config.clustering),
        }
    }
}

/// Read-only view of the manager state handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub viewport: Region,
    pub phase: SearchPhase,
    pub error: Option<SearchError>,
    /// Address the viewport was last centered on by a search
    pub resolved_address: Option<String>,
}

impl Snapshot {
    /// Whether a search is waiting on the debounce timer or the geocoder
    pub fn is_busy(&self) -> bool {
        self.phase != SearchPhase::Idle
    }
}

struct ManagerState {
    viewport: Region,
    search: SearchState,
    debouncer: Debouncer,
    initialized: bool,
    centroid: Option<Coordinate>,
    device_location: Option<Coordinate>,
}

impl ManagerState {
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            viewport: self.viewport,
            phase: self.search.phase(),
            error: self.search.error().cloned(),
            resolved_address: self.search.last_resolved().map(str::to_string),
        }
    }

    /// Move the viewport, refusing anything that would make it invalid
    fn recenter(&mut self, center: Coordinate, delta: f64) -> bool {
        if !center.is_valid() || !(delta.is_finite() && delta > 0.0) {
            warn!(%center, delta, "Refusing to move viewport to an invalid region");
            return false;
        }
        self.viewport = Region::around(center, delta);
        true
    }
}

struct Shared<G> {
    geocoder: G,
    settings: ManagerSettings,
    alive: AtomicBool,
    state: Mutex<ManagerState>,
    updates: watch::Sender<Snapshot>,
}

impl<G> Shared<G> {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ManagerState) {
        self.updates.send_replace(state.snapshot());
    }
}

impl<G: GeoBackend + 'static> Shared<G> {
    /// Debounce timer fired: mint a request if `ticket` is still current
    async fn fire(self: Arc<Self>, ticket: u64) {
        if !self.is_alive() {
            return;
        }

        let request = {
            let mut state = self.lock();
            let Some(request) = state.search.mint(ticket) else {
                return;
            };
            self.publish(&state);
            request
        };

        tokio::spawn(self.resolve(request));
    }

    /// Run one lookup and apply its outcome if it is still wanted
    async fn resolve(self: Arc<Self>, request: GeocodeRequest) {
        debug!(request = request.id, address = %request.address, "Geocoding address");
        let outcome = self.geocoder.geocode(&request.address).await;

        if !self.is_alive() {
            debug!(request = request.id, "Manager torn down, dropping geocode response");
            return;
        }

        let mut state = self.lock();
        match state.search.resolve(&request, outcome) {
            Resolution::Stale => return,
            Resolution::Recenter(center) => {
                if state.recenter(center, self.settings.result_delta) {
                    info!(address = %request.address, %center, "Centered on search result");
                }
            }
            Resolution::FallBack => {
                debug!(address = %request.address, "No location for address");
                if let Some(centroid) = state.centroid {
                    state.recenter(centroid, self.settings.centroid_delta);
                }
            }
            Resolution::Failed => {
                warn!(address = %request.address, "Address search failed");
            }
        }
        self.publish(&state);
    }
}

/// Owns the map viewport and everything that moves it
pub struct ViewportManager<G> {
    shared: Arc<Shared<G>>,
}

impl<G: GeoBackend + 'static> ViewportManager<G> {
    /// Create a manager showing the fallback region
    pub fn new(geocoder: G, settings: ManagerSettings) -> Self {
        let state = ManagerState {
            viewport: settings.fallback,
            search: SearchState::new(),
            debouncer: Debouncer::new(settings.debounce),
            initialized: false,
            centroid: None,
            device_location: None,
        };
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                geocoder,
                settings,
                alive: AtomicBool::new(true),
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    pub fn settings(&self) -> &ManagerSettings {
        &self.shared.settings
    }

    /// Current state, copied
    pub fn snapshot(&self) -> Snapshot {
        self.shared.updates.borrow().clone()
    }

    /// Receive a fresh snapshot after every change
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.shared.updates.subscribe()
    }

    pub fn viewport(&self) -> Region {
        self.shared.lock().viewport
    }

    pub fn error(&self) -> Option<SearchError> {
        self.shared.lock().search.error().cloned()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.lock().search.phase() != SearchPhase::Idle
    }

    /// Center on the centroid of the first non-empty point set seen
    ///
    /// Runs once per session: later calls are no-ops until [`reset`], and the
    /// call is skipped entirely while an address search is active. Returns
    /// whether the viewport moved.
    ///
    /// [`reset`]: ViewportManager::reset
    pub fn initialize_from_points<P>(&self, points: &[P]) -> bool
    where
        P: PointOfInterest + Clone,
    {
        let valid = filter_valid(points);
        let Some(center) = centroid(valid.iter().map(|p| p.coordinate())) else {
            return false;
        };

        let mut state = self.shared.lock();
        state.centroid = Some(center);

        if state.initialized || state.search.is_active() {
            return false;
        }

        if !state.recenter(center, self.shared.settings.centroid_delta) {
            return false;
        }
        state.initialized = true;
        info!(points = valid.len(), %center, "Centered on branch centroid");
        self.shared.publish(&state);
        true
    }

    /// Report the device position, or `None` when it is unavailable
    ///
    /// The first usable position re-centers the map, unless a search result
    /// or the branch centroid is already being shown.
    pub fn set_device_location(&self, location: Option<Coordinate>) {
        let location = location.filter(Coordinate::is_valid);

        let mut state = self.shared.lock();
        let first_fix = state.device_location.is_none() && location.is_some();
        state.device_location = location;

        if !first_fix || state.initialized || state.search.is_active() {
            return;
        }

        if let Some(center) = location {
            if state.recenter(center, self.shared.settings.default_delta) {
                debug!(%center, "Centered on device location");
                self.shared.publish(&state);
            }
        }
    }

    /// Last usable device position
    pub fn device_location(&self) -> Option<Coordinate> {
        self.shared.lock().device_location
    }

    /// Feed the text of the search box
    ///
    /// The placeholder text is ignored. New text is geocoded once typing has
    /// been quiet for the debounce interval.
    pub fn set_address(&self, address: &str) {
        if !self.shared.is_alive() || address == self.shared.settings.placeholder {
            return;
        }

        let mut state = self.shared.lock();
        match state.search.input(address) {
            InputOutcome::Unchanged => return,
            InputOutcome::Settled => {
                state.debouncer.cancel();
            }
            InputOutcome::Debounce(ticket) => {
                debug!(address = %state.search.current_address(), "Debouncing address");
                state.debouncer.arm(Arc::clone(&self.shared).fire(ticket));
            }
        }
        self.shared.publish(&state);
    }

    /// Geocode the current text again after a retryable failure
    ///
    /// Skips the debounce interval. Returns whether a lookup was started.
    pub fn retry(&self) -> bool {
        if !self.shared.is_alive() {
            return false;
        }

        let mut state = self.shared.lock();
        let Some(request) = state.search.retry() else {
            return false;
        };
        state.debouncer.cancel();
        self.shared.publish(&state);
        drop(state);

        info!(address = %request.address, "Retrying address search");
        tokio::spawn(Arc::clone(&self.shared).resolve(request));
        true
    }

    /// Forget the search and allow centroid initialization again
    pub fn reset(&self) {
        let mut state = self.shared.lock();
        state.debouncer.cancel();
        state.search.reset();
        state.initialized = false;
        debug!("Search state reset");
        self.shared.publish(&state);
    }

    /// Valid points worth drawing for the current viewport
    pub fn visible_points<P>(&self, points: &[P]) -> Vec<P>
    where
        P: PointOfInterest + Clone,
    {
        visible_points(points, &self.viewport(), self.shared.settings.max_visible)
    }

    /// Markers to draw for the current viewport
    pub fn markers<P>(&self, points: &[P]) -> Vec<ClusterMarker<P>>
    where
        P: PointOfInterest + Clone,
    {
        let viewport = self.viewport();
        let visible = visible_points(points, &viewport, self.shared.settings.max_visible);
        cluster_points(&visible, &viewport, &self.shared.settings.cluster)
    }
}

impl<G> ViewportManager<G> {
    /// Stop reacting to anything still in flight
    pub fn shutdown(&self) {
        if self.shared.alive.swap(false, Ordering::AcqRel) {
            self.shared.lock().debouncer.cancel();
            debug!("Viewport manager shut down");
        }
    }
}

impl<G> Drop for ViewportManager<G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
