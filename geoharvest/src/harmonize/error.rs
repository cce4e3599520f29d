//! Error types for layer harmonization.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for harmonization operations.
pub type HarmonizeResult<T> = Result<T, HarmonizeError>;

/// Errors that can occur while merging layers.
#[derive(Debug, Error)]
pub enum HarmonizeError {
    /// A source dataset could not be opened.
    #[error("failed to open {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    /// A layer could not be read from a source dataset.
    #[error("failed to read layer '{layer}' from {path}: {reason}")]
    Layer {
        layer: String,
        path: PathBuf,
        reason: String,
    },

    /// A layer carries no spatial reference, so its geometries cannot be
    /// normalized. The harmonizer treats this as a per-layer skip, not a
    /// run failure.
    #[error("layer '{layer}' in {path} has no spatial reference")]
    MissingCrs { layer: String, path: PathBuf },

    /// Geometry reprojection or conversion failed.
    #[error("geometry error in layer '{layer}': {reason}")]
    Geometry { layer: String, reason: String },

    /// A merged feature could not be serialized.
    #[error("failed to encode layer '{layer}': {reason}")]
    Encode { layer: String, reason: String },

    /// The artifact store failed to persist an output.
    #[error("failed to store {path}: {source}")]
    Store { path: PathBuf, source: io::Error },
}
