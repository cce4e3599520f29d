//! Virtual raster mosaic over zipped elevation tiles.
//!
//! Each elevation product is a zip archive wrapping a single IMG raster
//! tile. The builder unpacks every tile into a scratch directory and
//! builds one VRT descriptor referencing them all. The descriptor is an
//! index structure only; no pixel data is copied or resampled.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use gdal::programs::raster::build_vrt;
use gdal::Dataset;
use thiserror::Error;
use tracing::{debug, info};
use zip::ZipArchive;

/// Result type for mosaic operations.
pub type MosaicResult<T> = Result<T, MosaicError>;

/// File extension of the raster member expected inside each archive.
pub const RASTER_EXTENSION: &str = ".img";

/// Filename of the mosaic descriptor within the scratch directory.
const MOSAIC_FILENAME: &str = "dem.vrt";

/// Errors that can occur while building the mosaic.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// An input archive does not exist. Checked up front: the mosaic
    /// primitive reports a missing source with a far more confusing
    /// message of its own.
    #[error("input archive does not exist: {0}")]
    MissingInput(PathBuf),

    /// An archive does not contain exactly one raster member.
    #[error("expected exactly one {RASTER_EXTENSION} member in {archive}, found {count}")]
    AmbiguousArchiveContent { archive: PathBuf, count: usize },

    /// An archive could not be opened or read.
    #[error("failed to read archive {archive}: {reason}")]
    Archive { archive: PathBuf, reason: String },

    /// An unpacked raster could not be opened.
    #[error("failed to open raster {path}: {reason}")]
    Raster { path: PathBuf, reason: String },

    /// The mosaic descriptor could not be produced.
    #[error("failed to build mosaic {path}: {reason}")]
    BuildFailed { path: PathBuf, reason: String },

    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Builds a virtual mosaic from zipped raster tiles.
pub struct MosaicBuilder {
    scratch: PathBuf,
}

impl MosaicBuilder {
    /// Creates a builder with a fresh temporary scratch directory.
    pub fn new() -> MosaicResult<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("geoharvest-dem-")
            .tempdir()
            .map_err(|e| MosaicError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?
            .into_path();
        Ok(Self { scratch })
    }

    /// Creates a builder using the given scratch directory.
    pub fn with_scratch_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch: dir.into(),
        }
    }

    /// The directory unpacked rasters and the descriptor are written to.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    /// Unpacks every archive's raster tile and builds the mosaic
    /// descriptor referencing them.
    ///
    /// # Errors
    ///
    /// [`MosaicError::MissingInput`] if any archive path does not exist
    /// (checked before anything is extracted),
    /// [`MosaicError::AmbiguousArchiveContent`] unless each archive
    /// holds exactly one `.img` member, [`MosaicError::BuildFailed`] if
    /// the descriptor is not on disk after the build.
    pub fn build(&self, archive_paths: &[PathBuf]) -> MosaicResult<PathBuf> {
        let rasters = self.unpack_rasters(archive_paths)?;
        let descriptor = self.scratch.join(MOSAIC_FILENAME);

        let mut datasets = Vec::with_capacity(rasters.len());
        for raster in &rasters {
            let dataset = Dataset::open(raster).map_err(|e| MosaicError::Raster {
                path: raster.clone(),
                reason: e.to_string(),
            })?;
            datasets.push(dataset);
        }

        let vrt = build_vrt(Some(&descriptor), &datasets, None).map_err(|e| {
            MosaicError::BuildFailed {
                path: descriptor.clone(),
                reason: e.to_string(),
            }
        })?;
        // The descriptor is only flushed once the dataset handle closes.
        drop(vrt);

        if !descriptor.exists() {
            return Err(MosaicError::BuildFailed {
                path: descriptor,
                reason: "descriptor was not created".to_string(),
            });
        }

        info!(
            descriptor = %descriptor.display(),
            tiles = rasters.len(),
            "virtual mosaic built"
        );
        Ok(descriptor)
    }

    /// Extracts the single raster member of each archive into the
    /// scratch directory, preserving the member's base name.
    pub fn unpack_rasters(&self, archive_paths: &[PathBuf]) -> MosaicResult<Vec<PathBuf>> {
        for path in archive_paths {
            if !path.exists() {
                return Err(MosaicError::MissingInput(path.clone()));
            }
        }

        fs::create_dir_all(&self.scratch).map_err(|e| MosaicError::Io {
            path: self.scratch.clone(),
            source: e,
        })?;

        let mut unpacked = Vec::with_capacity(archive_paths.len());
        for path in archive_paths {
            unpacked.push(self.unpack_one(path)?);
        }
        Ok(unpacked)
    }

    fn unpack_one(&self, archive_path: &Path) -> MosaicResult<PathBuf> {
        let file = File::open(archive_path).map_err(|e| MosaicError::Io {
            path: archive_path.to_path_buf(),
            source: e,
        })?;
        let mut archive = ZipArchive::new(file).map_err(|e| MosaicError::Archive {
            archive: archive_path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut members: Vec<String> = archive
            .file_names()
            .filter(|name| name.ends_with(RASTER_EXTENSION))
            .map(String::from)
            .collect();
        if members.len() != 1 {
            return Err(MosaicError::AmbiguousArchiveContent {
                archive: archive_path.to_path_buf(),
                count: members.len(),
            });
        }
        let member_name = members.remove(0);

        let base_name = Path::new(&member_name)
            .file_name()
            .map(|name| name.to_owned())
            .ok_or_else(|| MosaicError::Archive {
                archive: archive_path.to_path_buf(),
                reason: format!("member '{}' has no file name", member_name),
            })?;
        let dest = self.scratch.join(base_name);

        let mut entry = archive
            .by_name(&member_name)
            .map_err(|e| MosaicError::Archive {
                archive: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let mut out = File::create(&dest).map_err(|e| MosaicError::Io {
            path: dest.clone(),
            source: e,
        })?;
        io::copy(&mut entry, &mut out).map_err(|e| MosaicError::Io {
            path: dest.clone(),
            source: e,
        })?;

        debug!(
            archive = %archive_path.display(),
            raster = %dest.display(),
            "unpacked raster tile"
        );
        Ok(dest)
    }
}
