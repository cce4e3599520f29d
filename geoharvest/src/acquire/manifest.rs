//! Acquisition manifest: product category to local file paths.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The product categories the pipeline acquires, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Nbd,
    Ned1,
    Contours,
    Nhd,
    Gnis,
    SmBound,
    SmContour,
    SmHydro,
    SmTrans,
    Nsd,
    Ntd,
    Woodland,
    CombinedVector,
}

impl ProductCategory {
    /// Every category, in acquisition order.
    pub const ALL: &'static [ProductCategory] = &[
        ProductCategory::Nbd,
        ProductCategory::Ned1,
        ProductCategory::Contours,
        ProductCategory::Nhd,
        ProductCategory::Gnis,
        ProductCategory::SmBound,
        ProductCategory::SmContour,
        ProductCategory::SmHydro,
        ProductCategory::SmTrans,
        ProductCategory::Nsd,
        ProductCategory::Ntd,
        ProductCategory::Woodland,
        ProductCategory::CombinedVector,
    ];

    /// The category key used in the persisted manifest.
    pub fn key(&self) -> &'static str {
        match self {
            ProductCategory::Nbd => "nbd",
            ProductCategory::Ned1 => "ned1",
            ProductCategory::Contours => "contours",
            ProductCategory::Nhd => "nhd",
            ProductCategory::Gnis => "gnis",
            ProductCategory::SmBound => "sm_bound",
            ProductCategory::SmContour => "sm_contour",
            ProductCategory::SmHydro => "sm_hydro",
            ProductCategory::SmTrans => "sm_trans",
            ProductCategory::Nsd => "nsd",
            ProductCategory::Ntd => "ntd",
            ProductCategory::Woodland => "woodland",
            ProductCategory::CombinedVector => "combined_vector",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.key() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|c| c.key()).collect();
                format!("unknown category '{}'; valid values: {}", s, valid.join(", "))
            })
    }
}

/// Immutable record of which local files were acquired per category.
///
/// Produced once by the acquisition run and persisted as a JSON object
/// (category key to list of path strings) so that harmonization stages
/// can run later, in a separate invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    categories: BTreeMap<String, Vec<PathBuf>>,
}

impl Manifest {
    /// Records the acquired paths for a category. A category with no
    /// matching products is recorded with an empty list.
    pub fn insert(&mut self, category: ProductCategory, paths: Vec<PathBuf>) {
        self.categories.insert(category.key().to_string(), paths);
    }

    /// The acquired paths for a category; empty when the category is
    /// absent or matched nothing.
    pub fn paths(&self, category: ProductCategory) -> &[PathBuf] {
        self.categories
            .get(category.key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of categories recorded.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of acquired files across all categories.
    pub fn file_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Writes the manifest as JSON.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Loads a manifest previously written by [`Manifest::save`].
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
