//! Search command handler
//!
//! Geocodes an address through the viewport manager and prints the map it
//! would show.

use crate::cli::{print_view, BranchSource};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::MapView;
use crate::geo::get_geocoder;
use crate::viewport::{ManagerSettings, ViewportManager};
use clap::Args;
use std::time::Duration;
use tracing::warn;

/// Give up on the geocoder after this long
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Address to search for
    pub address: String,

    #[command(flatten)]
    pub source: BranchSource,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let branches = args.source.load()?;

    let manager = ViewportManager::new(get_geocoder(&config)?, ManagerSettings::from(&config));
    manager.set_device_location(args.source.device_location(&config).await);
    manager.initialize_from_points(&branches);

    let mut updates = manager.subscribe();
    manager.set_address(&args.address);

    let settled = tokio::time::timeout(SEARCH_TIMEOUT, async {
        while updates.borrow_and_update().is_busy() {
            if updates.changed().await.is_err() {
                break;
            }
        }
    })
    .await;
    if settled.is_err() {
        return Err(Error::Geo(format!(
            "Timed out after {}s waiting for the geocoder",
            SEARCH_TIMEOUT.as_secs()
        )));
    }

    let snapshot = manager.snapshot();
    if let Some(error) = &snapshot.error {
        warn!(message = %error.message, "Search failed, showing previous viewport");
    }

    let view = MapView::new(snapshot, manager.markers(&branches));
    print_view(&view, args.format.as_deref(), &config)
}
