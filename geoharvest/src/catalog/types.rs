//! Query and response types for The National Map products catalog.
//!
//! The query side is fully typed: products, extent classes and file
//! formats are closed enums, and string input (for example from the
//! command line) goes through `FromStr` implementations that fail with
//! the complete list of valid values before any request is built.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::CatalogError;

/// Geographic bounding box in degrees.
///
/// Invariant: `west < east` and `south < north`, enforced on
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BoundingBox {
    /// Creates a bounding box, validating the corner ordering.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, CatalogError> {
        if west >= east || south >= north {
            return Err(CatalogError::InvalidArgument {
                field: "bbox",
                value: format!("{},{},{},{}", west, south, east, north),
                valid: "west,south,east,north with west < east and south < north".to_string(),
            });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    pub fn west(&self) -> f64 {
        self.west
    }

    pub fn south(&self) -> f64 {
        self.south
    }

    pub fn east(&self) -> f64 {
        self.east
    }

    pub fn north(&self) -> f64 {
        self.north
    }

    /// Serializes the box as the comma-joined form the catalog API
    /// expects: `west,south,east,north`.
    pub fn to_query_value(&self) -> String {
        format!("{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

impl FromStr for BoundingBox {
    type Err = CatalogError;

    /// Parses `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidArgument {
            field: "bbox",
            value: s.to_string(),
            valid: "four comma-separated numbers: west,south,east,north".to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(invalid());
        }
        let mut coords = [0.0f64; 4];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| invalid())?;
        }
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_value())
    }
}

macro_rules! catalog_enum {
    (
        $(#[$outer:meta])*
        $name:ident, $field:literal {
            $($(#[$variant_meta:meta])* $variant:ident => $code:literal),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            /// Every valid value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string form used by the catalog API.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }

            fn valid_values() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl FromStr for $name {
            type Err = CatalogError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(CatalogError::InvalidArgument {
                        field: $field,
                        value: s.to_string(),
                        valid: Self::valid_values(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

catalog_enum! {
    /// Spatial extent class of a catalog product.
    ProductExtent, "extent" {
        Degree1x1 => "1 x 1 degree",
        Degree1x2 => "1 x 2 degree",
        Degree1x3 => "1 x 3 degree",
        Degree1x4 => "1 x 4 degree",
        Minute15x15 => "15 x 15 minute",
        Degree2x1 => "2 x 1 degree",
        Minute3_75 => "3.75 x 3.75 minute",
        Minute30x30 => "30 x 30 minute",
        Minute30x60 => "30 x 60 minute",
        Minute7_5x15 => "7.5 x 15 minute",
        Minute7_5x7_5 => "7.5 x 7.5 minute",
        ContiguousUs => "Contiguous US",
        Hu2Region => "HU-2 Region",
        Hu4Subregion => "HU-4 Subregion",
        Hu8Subbasin => "HU-8 Subbasin",
        National => "National",
        NorthAmerica => "North America",
        State => "State",
        Varies => "Varies",
    }
}

catalog_enum! {
    /// File format of a catalog product.
    ProductFormat, "format" {
        ArcExport => "ArcExport",
        ArcGrid => "ArcGrid",
        Bil => "BIL",
        FileGdb => "FileGDB 10.1",
        GeoPdf => "GeoPDF",
        GeoTiff => "GeoTIFF",
        GridFloat => "GridFloat",
        Img => "IMG",
        Jpeg2000 => "JPEG2000",
        LasLaz => "LAS,LAZ",
        Shapefile => "Shapefile",
        Tiff => "TIFF",
        TxtPipes => "TXT (pipes)",
    }
}

catalog_enum! {
    /// Product families available from the catalog, addressed by short
    /// code. [`DataProduct::dataset_name`] gives the full dataset name
    /// the API expects in the `datasets` parameter.
    DataProduct, "product" {
        Nbd => "nbd",
        Nhd => "nhd",
        Wbd => "wbd",
        Naip => "naip",
        Ned13 => "ned1/3",
        Ned13Contours => "ned1/3_contours",
        Ned1 => "ned1",
        Gnis => "gnis",
        SmallScaleBoundaries => "sm_bound",
        SmallScaleContours => "sm_contour",
        SmallScaleHydrography => "sm_hydro",
        SmallScaleTransportation => "sm_trans",
        Nsd => "nsd",
        Ntd => "ntd",
        Woodland => "woodland",
        CombinedVector => "combined_vector",
    }
}

impl DataProduct {
    /// The human-readable dataset name used in the `datasets` query
    /// parameter.
    pub fn dataset_name(&self) -> &'static str {
        match self {
            DataProduct::Nbd => "National Boundary Dataset (NBD)",
            DataProduct::Nhd => "National Hydrography Dataset (NHD) Best Resolution",
            DataProduct::Wbd => "National Watershed Boundary Dataset (WBD)",
            DataProduct::Naip => "USDA National Agriculture Imagery Program (NAIP)",
            DataProduct::Ned13 => "National Elevation Dataset (NED) 1/3 arc-second",
            DataProduct::Ned13Contours => {
                "National Elevation Dataset (NED) 1/3 arc-second - Contours"
            }
            DataProduct::Ned1 => "National Elevation Dataset (NED) 1 arc-second",
            DataProduct::Gnis => "National Geographic Names Information System (GNIS)",
            DataProduct::SmallScaleBoundaries => "Small-scale Datasets - Boundaries",
            DataProduct::SmallScaleContours => "Small-scale Datasets - Contours",
            DataProduct::SmallScaleHydrography => "Small-scale Datasets - Hydrography",
            DataProduct::SmallScaleTransportation => "Small-scale Datasets - Transportation",
            DataProduct::Nsd => "National Structures Dataset (NSD)",
            DataProduct::Ntd => "National Transportation Dataset (NTD)",
            DataProduct::Woodland => "Land Cover - Woodland",
            DataProduct::CombinedVector => "Combined Vector",
        }
    }
}

/// A validated catalog query: product family, extent class and file
/// format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductQuery {
    pub product: DataProduct,
    pub extent: ProductExtent,
    pub format: ProductFormat,
}

impl ProductQuery {
    pub fn new(product: DataProduct, extent: ProductExtent, format: ProductFormat) -> Self {
        Self {
            product,
            extent,
            format,
        }
    }

    /// Builds a query from string values, validating each field against
    /// its fixed set. This is the fail-fast gate for user input: an
    /// invalid value errors here, before any request exists.
    pub fn parse(product: &str, extent: &str, format: &str) -> Result<Self, CatalogError> {
        Ok(Self {
            product: product.parse()?,
            extent: extent.parse()?,
            format: format.parse()?,
        })
    }
}

/// One record returned by the products endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogItem {
    /// Title of the product, when the server provides one.
    #[serde(default)]
    pub title: Option<String>,

    /// Direct download URL for the product file.
    #[serde(rename = "downloadURL")]
    pub download_url: String,

    /// Server-provided goodness-of-fit score against the query bbox.
    /// Items with a score of zero or less are discarded.
    #[serde(rename = "bestFitIndex", default)]
    pub best_fit_index: f64,
}

/// Top-level products response.
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogResponse {
    pub items: Vec<CatalogItem>,
    pub total: u64,
}
