//! Elevation mosaic command.

use std::path::PathBuf;

use clap::Args;
use geoharvest::acquire::{Manifest, ProductCategory};
use geoharvest::mosaic::MosaicBuilder;

use crate::error::CliError;

/// Arguments for `geoharvest mosaic`.
#[derive(Debug, Args)]
pub struct MosaicArgs {
    /// Path of the acquisition manifest
    #[arg(long, default_value = "paths.json")]
    pub manifest: PathBuf,

    /// Scratch directory for unpacked tiles (defaults to a fresh
    /// temporary directory)
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,
}

/// Build the virtual elevation mosaic from the acquired DEM tiles.
pub fn run(args: MosaicArgs) -> Result<(), CliError> {
    let manifest = Manifest::load(&args.manifest).map_err(|e| CliError::Manifest {
        path: args.manifest.clone(),
        reason: e.to_string(),
    })?;

    let builder = match args.scratch_dir {
        Some(dir) => MosaicBuilder::with_scratch_dir(dir),
        None => MosaicBuilder::new()?,
    };

    let archives = manifest.paths(ProductCategory::Ned1);
    let descriptor = builder.build(archives)?;

    println!(
        "Mosaic descriptor over {} tiles: {}",
        archives.len(),
        descriptor.display()
    );

    Ok(())
}
