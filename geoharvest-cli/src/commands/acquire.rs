//! Acquisition command.

use std::path::PathBuf;

use clap::Args;
use geoharvest::acquire::{Acquisition, ProductCategory};
use geoharvest::catalog::{BoundingBox, CatalogClient};
use geoharvest::download::FileCache;
use geoharvest::http::ReqwestClient;

use crate::error::CliError;

/// Arguments for `geoharvest acquire`.
#[derive(Debug, Args)]
pub struct AcquireArgs {
    /// Bounding box as west,south,east,north degrees
    #[arg(long)]
    pub bbox: String,

    /// Directory raw product files are downloaded into
    #[arg(long, default_value = "data/raw")]
    pub data_dir: PathBuf,

    /// Path the acquisition manifest is written to
    #[arg(long, default_value = "paths.json")]
    pub manifest: PathBuf,
}

/// Download every product family for the bounding box and persist the
/// manifest. Files already present in the data directory are not
/// re-fetched, so an interrupted run can simply be restarted.
pub fn run(args: AcquireArgs) -> Result<(), CliError> {
    let bbox: BoundingBox = args.bbox.parse()?;

    let acquisition = Acquisition::new(
        CatalogClient::new(ReqwestClient::new()?),
        FileCache::new(ReqwestClient::new()?),
        &args.data_dir,
    );

    let manifest = acquisition.acquire_to(&bbox, &args.manifest)?;

    println!("Acquired {} files:", manifest.file_count());
    for category in ProductCategory::ALL {
        println!(
            "  {:<16} {} files",
            category.key(),
            manifest.paths(*category).len()
        );
    }
    println!("Manifest written to {}", args.manifest.display());

    Ok(())
}
