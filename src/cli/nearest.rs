//! Nearest command handler
//!
//! Lists the branches closest to a point, nearest first.

use crate::cli::BranchSource;
use crate::config::Config;
use crate::coord::distance::distance_km;
use crate::coord::{Coordinate, PointOfInterest, Region};
use crate::error::{Error, Result};
use crate::viewport::visible_points;
use clap::Args;
use serde::Serialize;

/// Nearest command arguments
#[derive(Args)]
pub struct NearestArgs {
    #[command(flatten)]
    pub source: BranchSource,

    /// Latitude to measure from
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude to measure from
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// Number of branches to list
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// One line of the listing
#[derive(Debug, Serialize)]
struct NearestBranch<'a> {
    id: &'a str,
    name: &'a str,
    distance_km: f64,
}

/// Run the nearest command
pub async fn run(args: NearestArgs) -> Result<()> {
    let config = Config::load()?;
    let branches = args.source.load()?;

    let origin = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng),
        _ => args.source.device_location(&config).await.ok_or_else(|| {
            Error::Geo("No location specified. Use --lat/--lng or --here".to_string())
        })?,
    };
    origin.validate()?;

    let count = args.count.unwrap_or(config.viewport.max_visible);
    let mut nearest = visible_points(
        &branches,
        &Region::around(origin, config.viewport.default_delta),
        count,
    );
    // Small sets come back in input order
    nearest.sort_by(|a, b| {
        distance_km(origin, a.coordinate()).total_cmp(&distance_km(origin, b.coordinate()))
    });

    let rows: Vec<NearestBranch> = nearest
        .iter()
        .map(|b| NearestBranch {
            id: &b.id,
            name: &b.name,
            distance_km: distance_km(origin, b.coordinate()),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Nearest to {}:", origin);
        for row in &rows {
            println!("  {:>8.2} km  {}  {}", row.distance_km, row.id, row.name);
        }
    }

    Ok(())
}
