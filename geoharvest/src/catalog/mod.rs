//! Product catalog client for The National Map.
//!
//! This module provides typed queries against the products endpoint:
//! bounding-box search with server-side pagination and relevance
//! filtering. String input is validated against the fixed product,
//! extent and format sets before any request is issued.

mod client;
mod error;
mod types;

pub use client::{CatalogClient, CATALOG_BASE_URL};
pub use error::{CatalogError, CatalogResult};
pub use types::{
    BoundingBox, CatalogItem, DataProduct, ProductExtent, ProductFormat, ProductQuery,
};
