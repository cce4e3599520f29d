//! GeoHarvest CLI - Command-line interface
//!
//! This binary exposes the acquisition and harmonization pipeline as
//! subcommands. A typical session:
//!
//! ```bash
//! geoharvest acquire --bbox "-124.057946,46.315697,-117.916931,48.588924"
//! geoharvest extract
//! geoharvest mosaic
//! ```

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::{acquire, extract, mosaic, search};

#[derive(Debug, Parser)]
#[command(
    name = "geoharvest",
    version,
    about = "Acquire and harmonize National Map data for map-tile generation"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search the product catalog without downloading anything
    Search(search::SearchArgs),
    /// Download every product family for a bounding box
    Acquire(acquire::AcquireArgs),
    /// Merge acquired vector layers into cleaned GeoJSON datasets
    Extract(extract::ExtractArgs),
    /// Build the virtual elevation mosaic from acquired DEM tiles
    Mosaic(mosaic::MosaicArgs),
}

fn main() {
    let cli = Cli::parse();

    // Keep the guard alive for the lifetime of the process so the log
    // file is flushed on exit.
    let _logging = geoharvest::logging::init_logging("logs", "geoharvest.log");

    let result = match cli.command {
        Command::Search(args) => search::run(args),
        Command::Acquire(args) => acquire::run(args),
        Command::Extract(args) => extract::run(args),
        Command::Mosaic(args) => mosaic::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
