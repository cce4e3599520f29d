//! Filename-addressed download cache.
//!
//! Remote product files are cached on disk under the final path segment
//! of their URL. A file that already exists is never re-fetched unless
//! the caller asks for an overwrite, which makes interrupted acquisition
//! runs cheap to resume.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::http::{HttpClient, TransportError};

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while fetching a remote file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL has no usable final path segment to derive a filename from.
    #[error("cannot derive a filename from URL '{0}'")]
    InvalidUrl(String),

    /// The HTTP transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Filesystem operation failed.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Download cache generic over the HTTP transport.
pub struct FileCache<C: HttpClient> {
    pub(crate) http_client: C,
}

impl<C: HttpClient> FileCache<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }

    /// Fetches `url` into `directory`, returning the local path.
    ///
    /// The local filename is the last path segment of the URL; two URLs
    /// sharing a final segment overwrite one another. When `overwrite`
    /// is false and the file already exists, its path is returned with
    /// no network access.
    ///
    /// An interrupted write is not cleaned up, so a later call can treat
    /// a truncated file as already downloaded.
    ///
    /// # Errors
    ///
    /// [`DownloadError::InvalidUrl`] if no filename can be derived,
    /// [`DownloadError::Transport`] on HTTP failure,
    /// [`DownloadError::Io`] on filesystem failure.
    pub fn fetch(&self, url: &str, directory: &Path, overwrite: bool) -> DownloadResult<PathBuf> {
        let filename =
            filename_from_url(url).ok_or_else(|| DownloadError::InvalidUrl(url.to_string()))?;
        let local_path = directory.join(filename);

        if !overwrite && local_path.exists() {
            debug!(path = %local_path.display(), "download cache hit");
            return resolve(&local_path);
        }

        let body = self.http_client.get(url, &[])?;

        fs::create_dir_all(directory).map_err(|e| DownloadError::Io {
            path: directory.to_path_buf(),
            source: e,
        })?;
        fs::write(&local_path, &body).map_err(|e| DownloadError::Io {
            path: local_path.clone(),
            source: e,
        })?;

        debug!(url, path = %local_path.display(), bytes = body.len(), "downloaded");
        resolve(&local_path)
    }
}

/// Canonicalize a path that is known to exist.
fn resolve(path: &Path) -> DownloadResult<PathBuf> {
    path.canonicalize().map_err(|e| DownloadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Extracts the last path segment of a URL, with query string and
/// fragment stripped. Returns `None` when the segment is empty.
fn filename_from_url(url: &str) -> Option<&str> {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = match without_scheme.split_once('/') {
        Some((_, path)) => path,
        None => return None,
    };
    let path = path.split(['?', '#']).next().unwrap_or("");
    let segment = path.rsplit('/').next().unwrap_or("");
    if segment.is_empty() {
        None
    } else {
        Some(segment)
    }
}
