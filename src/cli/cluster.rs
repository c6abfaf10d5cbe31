//! Cluster command handler
//!
//! Groups a branch directory into map markers for a viewport.

use crate::cli::{print_view, BranchSource};
use crate::cluster::cluster_points;
use crate::config::Config;
use crate::coord::{Coordinate, Region};
use crate::error::Result;
use crate::format::MapView;
use crate::geo::get_geocoder;
use crate::viewport::{visible_points, ManagerSettings, Snapshot, ViewportManager};
use clap::Args;
use tracing::info;

/// Cluster command arguments
#[derive(Args)]
pub struct ClusterArgs {
    #[command(flatten)]
    pub source: BranchSource,

    /// Viewport center latitude (defaults to the branch centroid)
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Viewport center longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Latitude span of the viewport in degrees
    #[arg(long, short = 'd')]
    pub delta: Option<f64>,

    /// Cluster every branch instead of the nearest subset
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the cluster command
pub async fn run(args: ClusterArgs) -> Result<()> {
    let config = Config::load()?;
    let settings = ManagerSettings::from(&config);
    let branches = args.source.load()?;

    let manager = ViewportManager::new(get_geocoder(&config)?, settings.clone());
    manager.set_device_location(args.source.device_location(&config).await);
    manager.initialize_from_points(&branches);

    let mut viewport = manager.viewport();
    if let (Some(lat), Some(lng)) = (args.lat, args.lng) {
        let center = Coordinate::new(lat, lng);
        center.validate()?;
        viewport.center = center;
    }
    if let Some(delta) = args.delta {
        viewport = Region::around(viewport.center, delta);
    }

    let candidates = if args.all {
        crate::coord::validate::filter_valid(&branches)
    } else {
        visible_points(&branches, &viewport, settings.max_visible)
    };
    let markers = cluster_points(&candidates, &viewport, &settings.cluster);
    info!(
        branches = branches.len(),
        drawn = candidates.len(),
        markers = markers.len(),
        "Clustered branches"
    );

    let snapshot = Snapshot {
        viewport,
        ..manager.snapshot()
    };
    print_view(&MapView::new(snapshot, markers), args.format.as_deref(), &config)
}
