//! Artifact store for merged layer outputs.
//!
//! The harmonizer treats output existence as its resume cache: a key
//! that already exists is not recomputed. That contract lives behind a
//! trait so tests can fake it without touching a real filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{HarmonizeError, HarmonizeResult};

/// Keyed storage for produced artifacts.
///
/// Keys are plain file names (for example `NHDFlowline.geojson`); the
/// store decides where they live.
pub trait ArtifactStore {
    /// Whether an artifact with this key has already been produced.
    fn exists(&self, key: &str) -> bool;

    /// Persists an artifact, returning the path it now lives at.
    fn write(&self, key: &str, data: &[u8]) -> HarmonizeResult<PathBuf>;

    /// The path an artifact with this key lives (or would live) at.
    fn path_for(&self, key: &str) -> PathBuf;
}

/// Filesystem-backed artifact store rooted at an output directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactStore for DirectoryStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    fn write(&self, key: &str, data: &[u8]) -> HarmonizeResult<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|e| HarmonizeError::Store {
            path: self.root.clone(),
            source: e,
        })?;
        let path = self.path_for(key);
        fs::write(&path, data).map_err(|e| HarmonizeError::Store {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}
