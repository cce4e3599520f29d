//! Acquisition orchestrator.
//!
//! Drives the catalog client and the download cache over the fixed set
//! of product families the pipeline needs, for one bounding box, and
//! produces a [`Manifest`] of local paths grouped by category. The
//! manifest is the only state handed to later stages; nothing mutable
//! outlives the acquisition call.

mod manifest;

pub use manifest::{Manifest, ProductCategory};

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::catalog::{
    BoundingBox, CatalogClient, CatalogError, DataProduct, ProductExtent, ProductFormat,
    ProductQuery,
};
use crate::download::{DownloadError, FileCache};
use crate::http::HttpClient;

/// Result type for acquisition operations.
pub type AcquireResult<T> = Result<T, AcquireError>;

/// Errors that can occur during an acquisition run.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Catalog search failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Product download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Manifest persistence failed.
    #[error("failed to persist manifest to {path}: {source}")]
    Persist { path: PathBuf, source: io::Error },
}

/// One entry of the acquisition catalog: which product to search under
/// which category key.
#[derive(Debug, Clone, Copy)]
pub struct ProductRequest {
    pub category: ProductCategory,
    pub query: ProductQuery,
}

/// The fixed, ordered catalog of product families the pipeline acquires.
///
/// Contours come from the 1/3 arc-second derivative product; elevation
/// itself is pulled at 1 arc-second as zipped IMG tiles for the mosaic
/// stage. Combined Vector quads are only used to extract derived names.
pub fn product_catalog() -> [ProductRequest; 13] {
    use DataProduct as P;
    use ProductCategory as C;
    use ProductExtent as E;
    use ProductFormat as F;

    let entry = |category, product, extent, format| ProductRequest {
        category,
        query: ProductQuery::new(product, extent, format),
    };

    [
        entry(C::Nbd, P::Nbd, E::State, F::FileGdb),
        entry(C::Ned1, P::Ned1, E::Degree1x1, F::Img),
        entry(C::Contours, P::Ned13Contours, E::Degree1x1, F::FileGdb),
        entry(C::Nhd, P::Nhd, E::Hu8Subbasin, F::FileGdb),
        entry(C::Gnis, P::Gnis, E::State, F::TxtPipes),
        entry(C::SmBound, P::SmallScaleBoundaries, E::National, F::FileGdb),
        entry(C::SmContour, P::SmallScaleContours, E::National, F::FileGdb),
        entry(C::SmHydro, P::SmallScaleHydrography, E::National, F::FileGdb),
        entry(
            C::SmTrans,
            P::SmallScaleTransportation,
            E::National,
            F::FileGdb,
        ),
        entry(C::Nsd, P::Nsd, E::State, F::FileGdb),
        entry(C::Ntd, P::Ntd, E::State, F::FileGdb),
        entry(C::Woodland, P::Woodland, E::State, F::FileGdb),
        entry(
            C::CombinedVector,
            P::CombinedVector,
            E::Minute7_5x7_5,
            F::FileGdb,
        ),
    ]
}

/// Orchestrates catalog search and download for every product family.
///
/// Generic over two [`HttpClient`]s so the catalog and download
/// transports can be mocked independently.
pub struct Acquisition<C: HttpClient, D: HttpClient> {
    catalog: CatalogClient<C>,
    cache: FileCache<D>,
    data_dir: PathBuf,
}

impl<C: HttpClient, D: HttpClient> Acquisition<C, D> {
    pub fn new(
        catalog: CatalogClient<C>,
        cache: FileCache<D>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            cache,
            data_dir: data_dir.into(),
        }
    }

    /// Searches and downloads every product family for `bbox`.
    ///
    /// A category with zero matching items yields an empty path list;
    /// bounding boxes near dataset edges legitimately miss some product
    /// families. Already-downloaded files are not re-fetched.
    pub fn acquire(&self, bbox: &BoundingBox) -> AcquireResult<Manifest> {
        let mut manifest = Manifest::default();

        for request in product_catalog() {
            let items = self.catalog.search(bbox, &request.query)?;
            info!(
                category = request.category.key(),
                matches = items.len(),
                "catalog search"
            );

            let mut paths = Vec::with_capacity(items.len());
            for item in &items {
                let path = self.cache.fetch(&item.download_url, &self.data_dir, false)?;
                paths.push(path);
            }
            manifest.insert(request.category, paths);
        }

        info!(files = manifest.file_count(), "acquisition complete");
        Ok(manifest)
    }

    /// Like [`Acquisition::acquire`], and also persists the manifest to
    /// `manifest_path` for later, independently-invoked stages.
    pub fn acquire_to(&self, bbox: &BoundingBox, manifest_path: &Path) -> AcquireResult<Manifest> {
        let manifest = self.acquire(bbox)?;
        manifest
            .save(manifest_path)
            .map_err(|e| AcquireError::Persist {
                path: manifest_path.to_path_buf(),
                source: e,
            })?;
        Ok(manifest)
    }
}
