//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod cluster;
pub mod config;
pub mod nearest;
pub mod search;

use crate::branches::{load_branches, Branch};
use crate::config::Config;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, MapView};
use crate::geo::get_ip_locator;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Branch locator map engine
#[derive(Parser)]
#[command(name = "branch-locator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Cluster branches for a map viewport
    Cluster(cluster::ClusterArgs),

    /// List the branches nearest to a point
    Nearest(nearest::NearestArgs),

    /// Search for an address and show the resulting map
    Search(search::SearchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// List available output formats
    Formats,
}

/// Options shared by commands that read a branch directory
#[derive(Args)]
pub struct BranchSource {
    /// Branch directory snapshot (JSON array)
    #[arg(long, short = 'b')]
    pub branches: PathBuf,

    /// Use current location (IP geolocation) as the device location
    #[arg(long)]
    pub here: bool,
}

impl BranchSource {
    /// Load the branch directory
    pub fn load(&self) -> Result<Vec<Branch>> {
        load_branches(&self.branches)
    }

    /// Device location, if requested on the command line or in config
    pub async fn device_location(&self, config: &Config) -> Option<Coordinate> {
        if self.here || config.location.use_ip {
            get_ip_locator().device_location().await
        } else {
            None
        }
    }
}

/// Run the CLI
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Cluster(args) => cluster::run(args).await,
        Commands::Nearest(args) => nearest::run(args).await,
        Commands::Search(args) => search::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Formats => {
            list_formats();
            Ok(())
        }
    }
}

/// Format a view with the requested (or configured) formatter and print it
pub(crate) fn print_view(view: &MapView, format: Option<&str>, config: &Config) -> Result<()> {
    let format = format.unwrap_or(&config.output.format);
    let formatter = get_formatter(format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;
    println!("{}", formatter.format(view)?);
    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_cluster() {
        let cli = Cli::try_parse_from([
            "branch-locator", "cluster", "-b", "branches.json", "--lat", "14.6", "--lng", "121.0",
            "--delta", "0.5", "-f", "json",
        ])
        .unwrap();

        let Commands::Cluster(args) = cli.command else {
            panic!("expected cluster command");
        };
        assert_eq!(args.source.branches, PathBuf::from("branches.json"));
        assert_eq!((args.lat, args.lng), (Some(14.6), Some(121.0)));
        assert_eq!(args.delta, Some(0.5));
        assert_eq!(args.format.as_deref(), Some("json"));
        assert!(!args.all);
    }

    #[test]
    fn test_lat_requires_lng() {
        let parsed =
            Cli::try_parse_from(["branch-locator", "nearest", "-b", "b.json", "--lat", "14.6"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "branch-locator", "nearest", "-b", "b.json", "--lat", "-33.87", "--lng", "151.21",
        ])
        .unwrap();
        let Commands::Nearest(args) = cli.command else {
            panic!("expected nearest command");
        };
        assert_eq!(args.lat, Some(-33.87));
    }

    #[test]
    fn test_parse_search() {
        let cli =
            Cli::try_parse_from(["branch-locator", "search", "Ayala Avenue", "-b", "b.json", "--here"])
                .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(args.address, "Ayala Avenue");
        assert!(args.source.here);
    }
}
