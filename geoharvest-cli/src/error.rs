//! CLI error type.

use std::fmt;
use std::path::PathBuf;

use geoharvest::acquire::AcquireError;
use geoharvest::catalog::CatalogError;
use geoharvest::harmonize::HarmonizeError;
use geoharvest::http::TransportError;
use geoharvest::mosaic::MosaicError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Catalog query failed or had invalid arguments.
    Catalog(CatalogError),

    /// HTTP transport could not be created or failed.
    Transport(TransportError),

    /// Acquisition run failed.
    Acquire(AcquireError),

    /// Layer harmonization failed.
    Harmonize(HarmonizeError),

    /// Mosaic build failed.
    Mosaic(MosaicError),

    /// The manifest could not be read.
    Manifest { path: PathBuf, reason: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Catalog(e) => write!(f, "catalog error: {}", e),
            CliError::Transport(e) => write!(f, "transport error: {}", e),
            CliError::Acquire(e) => write!(f, "acquisition failed: {}", e),
            CliError::Harmonize(e) => write!(f, "harmonization failed: {}", e),
            CliError::Mosaic(e) => write!(f, "mosaic build failed: {}", e),
            CliError::Manifest { path, reason } => {
                write!(f, "failed to load manifest {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Catalog(e) => Some(e),
            CliError::Transport(e) => Some(e),
            CliError::Acquire(e) => Some(e),
            CliError::Harmonize(e) => Some(e),
            CliError::Mosaic(e) => Some(e),
            CliError::Manifest { .. } => None,
        }
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        CliError::Transport(e)
    }
}

impl From<AcquireError> for CliError {
    fn from(e: AcquireError) -> Self {
        CliError::Acquire(e)
    }
}

impl From<HarmonizeError> for CliError {
    fn from(e: HarmonizeError) -> Self {
        CliError::Harmonize(e)
    }
}

impl From<MosaicError> for CliError {
    fn from(e: MosaicError) -> Self {
        CliError::Mosaic(e)
    }
}
