//! Derived place-name extraction from Combined Vector quads.
//!
//! The Combined Vector product ships one geodatabase per 7.5-minute
//! quad, each carrying a curated names layer filtered and enriched for
//! labeling. Only that single layer is wanted from the (much larger)
//! quad set, with a fixed column selection.

use std::path::PathBuf;

use super::error::HarmonizeResult;
use super::reader::LayerReader;
use super::store::ArtifactStore;
use super::{ColumnKeepSpec, HarmonizeOptions, Harmonizer};

/// The names layer within each Combined Vector quad geodatabase.
pub const DERIVED_NAMES_LAYER: &str = "TNMDerivedNames";

/// Attributes kept for derived names: name, feature class, elevation and
/// feature code. The geometry rides along as always.
pub const DERIVED_NAMES_COLUMNS: [&str; 4] = [
    "gaz_name",
    "gaz_featureclass",
    "gaz_elevation",
    "gaz_featurecode",
];

impl<R: LayerReader, S: ArtifactStore> Harmonizer<R, S> {
    /// Merges the derived-names layer across the quad files.
    ///
    /// Same merge, resume and CRS rules as [`Harmonizer::harmonize`],
    /// restricted to [`DERIVED_NAMES_LAYER`] with the fixed
    /// [`DERIVED_NAMES_COLUMNS`] selection. Returns the single output
    /// path, or `None` when the layer is absent, empty or CRS-less.
    pub fn extract_derived_names(
        &self,
        paths: &[PathBuf],
        overwrite: bool,
    ) -> HarmonizeResult<Option<PathBuf>> {
        let mut keep_columns = ColumnKeepSpec::new();
        keep_columns.insert(
            DERIVED_NAMES_LAYER.to_string(),
            Some(
                DERIVED_NAMES_COLUMNS
                    .iter()
                    .map(|col| col.to_string())
                    .collect(),
            ),
        );

        let options = HarmonizeOptions::new()
            .keep_layers(vec![DERIVED_NAMES_LAYER.to_string()])
            .keep_columns(keep_columns)
            .overwrite(overwrite);

        let mut outputs = self.harmonize(paths, &options)?;
        debug_assert!(outputs.len() <= 1);
        Ok(outputs.pop())
    }
}
