//! Error types for the catalog client.

use thiserror::Error;

use crate::http::TransportError;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur while querying the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A query field failed validation against its fixed value set.
    ///
    /// Raised before any request is issued, so a bad query never touches
    /// the network.
    #[error("invalid {field} '{value}'; valid values: {valid}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        valid: String,
    },

    /// The HTTP transport failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server response could not be decoded.
    #[error("malformed catalog response: {reason}")]
    Malformed { reason: String },
}
