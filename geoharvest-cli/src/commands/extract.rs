//! Layer extraction command.
//!
//! Runs the cleaning sequence over the acquired files: administrative
//! boundaries, the hydrography feature layers used for styling, contours
//! and derived place names. Each merged layer lands as
//! `<out_dir>/<layer>.geojson` in newline-delimited form.

use std::path::PathBuf;

use clap::Args;
use geoharvest::acquire::{Manifest, ProductCategory};
use geoharvest::harmonize::{DirectoryStore, GdalReader, HarmonizeOptions, Harmonizer};
use tracing::info;

use crate::error::CliError;

/// The NHD feature layers worth carrying into tiles; the remaining
/// layers of the hydrography geodatabases are metadata and event tables.
const NHD_LAYERS: [&str; 5] = [
    "NHDArea",
    "NHDFlowline",
    "NHDLine",
    "NHDPoint",
    "NHDWaterbody",
];

/// Arguments for `geoharvest extract`.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Path of the acquisition manifest
    #[arg(long, default_value = "paths.json")]
    pub manifest: PathBuf,

    /// Directory merged layers are written into
    #[arg(long, default_value = "data/cleaned")]
    pub out_dir: PathBuf,

    /// Reprocess layers whose output already exists
    #[arg(long)]
    pub overwrite: bool,
}

/// Merge the acquired vector datasets into cleaned GeoJSON layers.
pub fn run(args: ExtractArgs) -> Result<(), CliError> {
    let manifest = Manifest::load(&args.manifest).map_err(|e| CliError::Manifest {
        path: args.manifest.clone(),
        reason: e.to_string(),
    })?;

    info!(
        files = manifest.file_count(),
        out_dir = %args.out_dir.display(),
        "extracting merged layers"
    );

    let harmonizer = Harmonizer::new(GdalReader::new(), DirectoryStore::new(&args.out_dir));
    let mut produced = 0;

    // National boundaries: every layer.
    let outputs = harmonizer.harmonize(
        manifest.paths(ProductCategory::Nbd),
        &HarmonizeOptions::new().overwrite(args.overwrite),
    )?;
    produced += outputs.len();

    // Hydrography: only the feature layers.
    let nhd_options = HarmonizeOptions::new()
        .keep_layers(NHD_LAYERS.iter().map(|l| l.to_string()).collect())
        .overwrite(args.overwrite);
    let outputs = harmonizer.harmonize(manifest.paths(ProductCategory::Nhd), &nhd_options)?;
    produced += outputs.len();

    // Elevation contours: every layer.
    let outputs = harmonizer.harmonize(
        manifest.paths(ProductCategory::Contours),
        &HarmonizeOptions::new().overwrite(args.overwrite),
    )?;
    produced += outputs.len();

    // Derived place names from the combined-vector quads.
    let names = harmonizer.extract_derived_names(
        manifest.paths(ProductCategory::CombinedVector),
        args.overwrite,
    )?;
    if names.is_some() {
        produced += 1;
    }

    println!(
        "{} merged layers in {}",
        produced,
        args.out_dir.display()
    );

    Ok(())
}
