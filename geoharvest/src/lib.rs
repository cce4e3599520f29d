//! GeoHarvest - acquisition and harmonization of public geospatial data
//!
//! This library downloads USGS National Map products intersecting a
//! bounding box and normalizes them for map-tile generation:
//!
//! - [`catalog`] searches the products catalog with pagination and
//!   relevance filtering
//! - [`download`] caches product files on disk, keyed by filename
//! - [`acquire`] orchestrates both across every product family and
//!   records the result in a persistable manifest
//! - [`harmonize`] merges a named layer across many geodatabase files
//!   into one CRS-normalized, newline-delimited GeoJSON dataset
//! - [`mosaic`] unpacks zipped elevation tiles and builds a virtual
//!   raster over them

pub mod acquire;
pub mod catalog;
pub mod download;
pub mod harmonize;
pub mod http;
pub mod logging;
pub mod mosaic;
