//! GeoScene CLI - Command-line interface
//!
//! Projects coordinates, converts local ENU offsets, renders map objects to
//! PNG and manages the configuration file.

mod commands;
mod error;
mod runner;

use std::process;

use clap::{Parser, Subcommand};

use commands::common::LonLat;
use commands::config::ConfigCommands;
use commands::enu::EnuArgs;
use commands::project::ProjectArgs;
use commands::render::RenderArgs;
use error::CliError;
use runner::CliRunner;

#[derive(Debug, Parser)]
#[command(name = "geoscene", version, about = "Geo-referenced objects on tile-projected scenes")]
struct Cli {
    /// Log filter, overriding logging.level (e.g. debug, geoscene::scene=trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Project a lon/lat point to scene pixel and tile coordinates
    Project {
        /// Longitude in degrees
        #[arg(allow_negative_numbers = true)]
        lon: f64,

        /// Latitude in degrees
        #[arg(allow_negative_numbers = true)]
        lat: f64,

        /// Zoom level (defaults to map.zoom)
        #[arg(long)]
        zoom: Option<u8>,

        /// Tile size in pixels (defaults to map.tile_size)
        #[arg(long)]
        tile_size: Option<u32>,
    },

    /// Convert an East-North-Up offset to lon/lat/alt around a reference
    Enu {
        /// East offset in meters (longitude with --inverse)
        #[arg(allow_negative_numbers = true)]
        east: f64,

        /// North offset in meters (latitude with --inverse)
        #[arg(allow_negative_numbers = true)]
        north: f64,

        /// Up offset in meters (altitude with --inverse)
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        up: f64,

        /// Reference point as lon,lat
        #[arg(long = "ref", allow_hyphen_values = true)]
        reference: LonLat,

        /// Reference altitude in meters
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        ref_alt: f64,

        /// Convert lon/lat/alt to an ENU offset instead
        #[arg(long)]
        inverse: bool,
    },

    /// Render circles and rectangles to a PNG
    Render(RenderArgs),

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Config commands must work even when the config file is broken
    if let Commands::Config { command } = cli.command {
        return commands::config::run(command);
    }

    let runner = CliRunner::new(cli.log_level.as_deref())?;
    let config = runner.config();

    match cli.command {
        Commands::Project {
            lon,
            lat,
            zoom,
            tile_size,
        } => {
            runner.log_startup("project");
            commands::project::run(ProjectArgs {
                lon,
                lat,
                zoom: zoom.unwrap_or(config.map.zoom),
                tile_size: tile_size.unwrap_or(config.map.tile_size),
            })
        }
        Commands::Enu {
            east,
            north,
            up,
            reference,
            ref_alt,
            inverse,
        } => {
            runner.log_startup("enu");
            commands::enu::run(EnuArgs {
                values: [east, north, up],
                reference: reference.0,
                ref_alt,
                inverse,
            })
        }
        Commands::Render(args) => {
            runner.log_startup("render");
            commands::render::run(args, config)
        }
        Commands::Config { .. } => Ok(()),
    }
}
