//! Integration tests for the layer harmonization pipeline.
//!
//! These tests exercise the full merge flow against a real output
//! directory: layer discovery across sources, column trimming,
//! newline-delimited GeoJSON output and resumability.
//!
//! Run with: `cargo test --test harmonize_pipeline`

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use geoharvest::harmonize::{
    ArtifactStore, ColumnKeepSpec, DirectoryStore, FeatureRecord, HarmonizeError, HarmonizeOptions,
    HarmonizeResult, Harmonizer, LayerReader,
};

// ============================================================================
// Fixture Reader
// ============================================================================

/// In-memory stand-in for a directory of geodatabase files.
struct FixtureReader {
    files: Vec<(PathBuf, Vec<(String, Vec<FeatureRecord>)>)>,
    reads: Mutex<Vec<String>>,
}

impl FixtureReader {
    fn new(files: Vec<(PathBuf, Vec<(String, Vec<FeatureRecord>)>)>) -> Self {
        Self {
            files,
            reads: Mutex::new(Vec::new()),
        }
    }

    fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }
}

impl LayerReader for FixtureReader {
    fn layer_names(&self, path: &Path) -> HarmonizeResult<Vec<String>> {
        let (_, layers) = self
            .files
            .iter()
            .find(|(p, _)| p == path)
            .expect("unknown fixture path");
        Ok(layers.iter().map(|(name, _)| name.clone()).collect())
    }

    fn read_layer(&self, path: &Path, layer: &str) -> HarmonizeResult<Vec<FeatureRecord>> {
        self.reads.lock().unwrap().push(layer.to_string());
        let (_, layers) = self
            .files
            .iter()
            .find(|(p, _)| p == path)
            .expect("unknown fixture path");
        layers
            .iter()
            .find(|(name, _)| name == layer)
            .map(|(_, records)| records.clone())
            .ok_or_else(|| HarmonizeError::Layer {
                layer: layer.to_string(),
                path: path.to_path_buf(),
                reason: "layer not present".to_string(),
            })
    }
}

/// A road feature with the given attributes and a short line geometry.
fn road(attrs: &[(&str, Value)]) -> FeatureRecord {
    FeatureRecord {
        attributes: attrs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
        geometry: Some(geojson::Geometry::new(geojson::Value::LineString(vec![
            vec![-122.91, 47.03],
            vec![-122.90, 47.04],
        ]))),
    }
}

/// Three regional files sharing a "Roads" layer with differing schemas.
fn roads_fixture() -> FixtureReader {
    FixtureReader::new(vec![
        (
            PathBuf::from("/data/raw/region_a.gdb"),
            vec![(
                "Roads".to_string(),
                vec![
                    road(&[("name", Value::from("Main St")), ("lanes", Value::from(2))]),
                    road(&[("name", Value::from("First Ave")), ("lanes", Value::from(4))]),
                ],
            )],
        ),
        (
            PathBuf::from("/data/raw/region_b.gdb"),
            vec![(
                "Roads".to_string(),
                vec![road(&[
                    ("name", Value::from("Canyon Rd")),
                    ("surface", Value::from("gravel")),
                ])],
            )],
        ),
        (
            PathBuf::from("/data/raw/region_c.gdb"),
            vec![(
                "Roads".to_string(),
                vec![
                    road(&[("name", Value::from("Summit Way"))]),
                    road(&[("name", Value::from("Delphi Rd"))]),
                    road(&[("name", Value::from("Waddell Creek Rd"))]),
                ],
            )],
        ),
    ])
}

fn fixture_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/data/raw/region_a.gdb"),
        PathBuf::from("/data/raw/region_b.gdb"),
        PathBuf::from("/data/raw/region_c.gdb"),
    ]
}

// ============================================================================
// Integration Tests
// ============================================================================

/// The end-to-end merge: three sources with differing attribute sets,
/// trimmed to a single column, produce one output whose features each
/// carry exactly `name` plus geometry, with the summed feature count.
#[test]
fn test_roads_merge_with_column_trim() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = DirectoryStore::new(temp.path().join("cleaned"));
    let harmonizer = Harmonizer::new(roads_fixture(), store);

    let mut keep_columns = ColumnKeepSpec::new();
    keep_columns.insert("Roads".to_string(), Some(vec!["name".to_string()]));
    let options = HarmonizeOptions::new().keep_columns(keep_columns);

    let outputs = harmonizer.harmonize(&fixture_paths(), &options).unwrap();
    assert_eq!(outputs.len(), 1);
    let output = &outputs[0];
    assert_eq!(output.file_name().unwrap(), "Roads.geojson");

    let content = std::fs::read_to_string(output).unwrap();
    let features: Vec<geojson::Feature> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // 2 + 1 + 3 features across the three regional files.
    assert_eq!(features.len(), 6);
    for feature in &features {
        let properties = feature.properties.as_ref().unwrap();
        let keys: Vec<_> = properties.keys().cloned().collect();
        assert_eq!(keys, vec!["name"]);
        assert!(feature.geometry.is_some());
    }
}

/// A second run over the same output directory reuses the existing
/// artifact without reading any source data.
#[test]
fn test_rerun_resumes_from_existing_output() {
    let temp = tempfile::TempDir::new().unwrap();
    let out_dir = temp.path().join("cleaned");
    let options = HarmonizeOptions::new();

    let first = Harmonizer::new(roads_fixture(), DirectoryStore::new(&out_dir));
    let first_outputs = first.harmonize(&fixture_paths(), &options).unwrap();
    assert_eq!(first.reader().read_count(), 3);

    let second = Harmonizer::new(roads_fixture(), DirectoryStore::new(&out_dir));
    let second_outputs = second.harmonize(&fixture_paths(), &options).unwrap();

    assert_eq!(first_outputs, second_outputs);
    assert_eq!(second.reader().read_count(), 0);
}

/// Overwrite mode reprocesses even when outputs exist.
#[test]
fn test_overwrite_reprocesses() {
    let temp = tempfile::TempDir::new().unwrap();
    let out_dir = temp.path().join("cleaned");

    let first = Harmonizer::new(roads_fixture(), DirectoryStore::new(&out_dir));
    first
        .harmonize(&fixture_paths(), &HarmonizeOptions::new())
        .unwrap();

    let second = Harmonizer::new(roads_fixture(), DirectoryStore::new(&out_dir));
    let outputs = second
        .harmonize(&fixture_paths(), &HarmonizeOptions::new().overwrite(true))
        .unwrap();

    assert_eq!(outputs.len(), 1);
    assert_eq!(second.reader().read_count(), 3);
}

/// The artifact store contract: paths reported for reused outputs match
/// the paths of fresh writes.
#[test]
fn test_store_paths_are_stable() {
    let temp = tempfile::TempDir::new().unwrap();
    let store = DirectoryStore::new(temp.path().join("cleaned"));
    let expected = store.path_for("Roads.geojson");

    let harmonizer = Harmonizer::new(roads_fixture(), store);
    let outputs = harmonizer
        .harmonize(&fixture_paths(), &HarmonizeOptions::new())
        .unwrap();

    assert_eq!(outputs, vec![expected]);
}
