//! Catalog search command.

use clap::Args;
use geoharvest::catalog::{BoundingBox, CatalogClient, ProductQuery};
use geoharvest::http::ReqwestClient;

use crate::error::CliError;

/// Arguments for `geoharvest search`.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Bounding box as west,south,east,north degrees
    #[arg(long)]
    pub bbox: String,

    /// Product code (e.g. nhd, ned1, gnis)
    #[arg(long)]
    pub product: String,

    /// Extent class (e.g. "State", "HU-8 Subbasin")
    #[arg(long)]
    pub extent: String,

    /// File format (e.g. "FileGDB 10.1", "IMG")
    #[arg(long)]
    pub format: String,
}

/// Search the catalog and print matching products without downloading.
pub fn run(args: SearchArgs) -> Result<(), CliError> {
    let bbox: BoundingBox = args.bbox.parse()?;
    let query = ProductQuery::parse(&args.product, &args.extent, &args.format)?;

    let client = CatalogClient::new(ReqwestClient::new()?);
    let items = client.search(&bbox, &query)?;

    println!("{} matching products", items.len());
    for item in &items {
        match &item.title {
            Some(title) => println!("  {}\n    {}", title, item.download_url),
            None => println!("  {}", item.download_url),
        }
    }

    Ok(())
}
