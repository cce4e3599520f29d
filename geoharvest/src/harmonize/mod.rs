//! Layer harmonization: merge one named layer across many source files
//! into a single CRS-normalized, schema-trimmed output.
//!
//! Source files of one dataset family (for example the per-subbasin
//! hydrography geodatabases) share a layer naming scheme but differ in
//! which layers they carry, in attribute schemas and in coordinate
//! reference systems. For each selected layer name the harmonizer
//! concatenates the layer's features from every file that has it, in
//! geographic WGS84, optionally trimmed to a fixed column list, and
//! writes the merge as newline-delimited GeoJSON: one feature per line,
//! which downstream tiling tools parse far faster than a single
//! GeoJSON document.

mod error;
mod names;
mod reader;
mod store;

pub use error::{HarmonizeError, HarmonizeResult};
pub use names::{DERIVED_NAMES_COLUMNS, DERIVED_NAMES_LAYER};
pub use reader::{FeatureRecord, GdalReader, LayerReader};
pub use store::{ArtifactStore, DirectoryStore};

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info, warn};

/// Layer name to optional ordered list of attributes to keep.
///
/// `None` (or an absent entry) keeps every column. The geometry is
/// always retained, whatever the list says.
pub type ColumnKeepSpec = HashMap<String, Option<Vec<String>>>;

/// Options controlling a harmonization run.
#[derive(Debug, Clone, Default)]
pub struct HarmonizeOptions {
    /// Restrict processing to these layer names (intersected with the
    /// names actually discovered). `None` processes every layer.
    pub keep_layers: Option<Vec<String>>,

    /// Per-layer column trimming.
    pub keep_columns: ColumnKeepSpec,

    /// Reprocess layers whose output already exists.
    pub overwrite: bool,
}

impl HarmonizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keep_layers(mut self, layers: Vec<String>) -> Self {
        self.keep_layers = Some(layers);
        self
    }

    pub fn keep_columns(mut self, spec: ColumnKeepSpec) -> Self {
        self.keep_columns = spec;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Merges layers across source files through a [`LayerReader`] and
/// persists results through an [`ArtifactStore`].
pub struct Harmonizer<R: LayerReader, S: ArtifactStore> {
    reader: R,
    store: S,
}

impl<R: LayerReader, S: ArtifactStore> Harmonizer<R, S> {
    pub fn new(reader: R, store: S) -> Self {
        Self { reader, store }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merges every selected layer across `paths`.
    ///
    /// Layer processing order is deterministic: sorted, case-sensitive,
    /// lexicographic by code point. Returns the output path of every
    /// layer produced or confirmed present, in that order.
    ///
    /// Per-layer conditions that do not abort the run:
    /// - an existing output (without `overwrite`) is reused as-is;
    /// - a layer without a spatial reference in any contributing file is
    ///   skipped with a warning (attribute-only tables are not merged);
    /// - a layer whose merge holds zero features is not written.
    pub fn harmonize(
        &self,
        paths: &[PathBuf],
        options: &HarmonizeOptions,
    ) -> HarmonizeResult<Vec<PathBuf>> {
        // Per-file inventories drive both the union and the
        // which-file-has-this-layer checks below.
        let mut inventories = Vec::with_capacity(paths.len());
        for path in paths {
            let names: BTreeSet<String> = self.reader.layer_names(path)?.into_iter().collect();
            inventories.push((path, names));
        }

        let mut layers: BTreeSet<String> = BTreeSet::new();
        for (_, names) in &inventories {
            layers.extend(names.iter().cloned());
        }

        let selected: Vec<&String> = match &options.keep_layers {
            Some(keep) => layers
                .iter()
                .filter(|name| keep.contains(*name))
                .collect(),
            None => layers.iter().collect(),
        };

        let mut outputs = Vec::new();
        'layers: for layer in selected {
            let key = format!("{}.geojson", layer);

            if !options.overwrite && self.store.exists(&key) {
                debug!(layer = %layer, "output already present");
                outputs.push(self.store.path_for(&key));
                continue;
            }

            let mut features: Vec<FeatureRecord> = Vec::new();
            for (path, names) in &inventories {
                if !names.contains(layer.as_str()) {
                    continue;
                }
                match self.reader.read_layer(path, layer) {
                    Ok(mut records) => features.append(&mut records),
                    Err(HarmonizeError::MissingCrs { .. }) => {
                        warn!(
                            layer = %layer,
                            path = %path.display(),
                            "no spatial reference; skipping layer (attribute-only table?)"
                        );
                        continue 'layers;
                    }
                    Err(e) => return Err(e),
                }
            }

            // Never write an empty dataset.
            if features.is_empty() {
                continue;
            }

            let keep_cols = options
                .keep_columns
                .get(layer.as_str())
                .and_then(|cols| cols.as_deref());
            let count = features.len();
            let encoded = encode_features(layer, features, keep_cols)?;
            let path = self.store.write(&key, &encoded)?;
            info!(layer = %layer, features = count, "merged layer written");
            outputs.push(path);
        }

        Ok(outputs)
    }
}

/// Serializes records as newline-delimited GeoJSON features.
///
/// With a keep-column list, every output feature carries exactly those
/// attributes in the given order (missing ones as null); otherwise all
/// attributes pass through in source order. The geometry is always kept.
fn encode_features(
    layer: &str,
    features: Vec<FeatureRecord>,
    keep_cols: Option<&[String]>,
) -> HarmonizeResult<Vec<u8>> {
    let mut out = Vec::new();
    for record in features {
        let mut properties = geojson::JsonObject::new();
        match keep_cols {
            Some(cols) => {
                for col in cols {
                    let value = record
                        .attributes
                        .iter()
                        .find(|(name, _)| name == col)
                        .map(|(_, value)| value.clone())
                        .unwrap_or(Value::Null);
                    properties.insert(col.clone(), value);
                }
            }
            None => {
                for (name, value) in record.attributes {
                    properties.insert(name, value);
                }
            }
        }

        let feature = geojson::Feature {
            bbox: None,
            geometry: record.geometry,
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };

        let line = serde_json::to_string(&feature).map_err(|e| HarmonizeError::Encode {
            layer: layer.to_string(),
            reason: e.to_string(),
        })?;
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    Ok(out)
}
