//! Vector source access behind a trait seam.
//!
//! [`LayerReader`] is the harmonizer's only view of vector files:
//! enumerate layer names, read a named layer. The GDAL-backed
//! implementation normalizes every geometry to geographic WGS84 while
//! reading, so everything downstream works in one CRS. Tests substitute
//! an in-memory reader.

use std::path::{Path, PathBuf};

use gdal::spatial_ref::{AxisMappingStrategy, CoordTransform, SpatialRef};
use gdal::vector::{FieldValue, LayerAccess};
use gdal::Dataset;
use serde_json::Value;

use super::error::{HarmonizeError, HarmonizeResult};

/// One feature read from a source layer: attributes in schema order and
/// a geometry already reprojected to EPSG:4326.
///
/// Features without a geometry keep `None` and serialize with a null
/// geometry, matching how attribute rows in spatial layers behave.
#[derive(Debug, Clone)]
pub struct FeatureRecord {
    pub attributes: Vec<(String, Value)>,
    pub geometry: Option<geojson::Geometry>,
}

/// Read access to multi-layer vector files.
pub trait LayerReader {
    /// Enumerates the layer names present in the file.
    fn layer_names(&self, path: &Path) -> HarmonizeResult<Vec<String>>;

    /// Reads every feature of the named layer, reprojected to EPSG:4326.
    ///
    /// # Errors
    ///
    /// [`HarmonizeError::MissingCrs`] when the layer has no spatial
    /// reference to reproject from.
    fn read_layer(&self, path: &Path, layer: &str) -> HarmonizeResult<Vec<FeatureRecord>>;
}

/// GDAL-backed [`LayerReader`].
///
/// Zip archives (zipped file geodatabases and shapefiles) are opened
/// through GDAL's `/vsizip/` virtual filesystem.
#[derive(Debug, Default)]
pub struct GdalReader;

impl GdalReader {
    pub fn new() -> Self {
        Self
    }

    fn open(&self, path: &Path) -> HarmonizeResult<Dataset> {
        let target = vsi_path(path);
        Dataset::open(&target).map_err(|e| HarmonizeError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl LayerReader for GdalReader {
    fn layer_names(&self, path: &Path) -> HarmonizeResult<Vec<String>> {
        let dataset = self.open(path)?;
        Ok(dataset.layers().map(|layer| layer.name()).collect())
    }

    fn read_layer(&self, path: &Path, layer: &str) -> HarmonizeResult<Vec<FeatureRecord>> {
        let dataset = self.open(path)?;
        let mut source = dataset
            .layer_by_name(layer)
            .map_err(|e| HarmonizeError::Layer {
                layer: layer.to_string(),
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let source_srs = source
            .spatial_ref()
            .ok_or_else(|| HarmonizeError::MissingCrs {
                layer: layer.to_string(),
                path: path.to_path_buf(),
            })?;

        let transform = wgs84_transform(&source_srs).map_err(|e| HarmonizeError::Layer {
            layer: layer.to_string(),
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut records = Vec::new();
        for feature in source.features() {
            let attributes = feature
                .fields()
                .map(|(name, value)| (name, value.map(field_to_json).unwrap_or(Value::Null)))
                .collect();

            let geometry = match feature.geometry() {
                Some(geometry) => Some(to_geojson(geometry, &transform).map_err(|reason| {
                    HarmonizeError::Geometry {
                        layer: layer.to_string(),
                        reason,
                    }
                })?),
                None => None,
            };

            records.push(FeatureRecord {
                attributes,
                geometry,
            });
        }

        Ok(records)
    }
}

/// Prefix zip archives for GDAL's virtual filesystem.
fn vsi_path(path: &Path) -> PathBuf {
    let is_zip = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        PathBuf::from(format!("/vsizip/{}", path.display()))
    } else {
        path.to_path_buf()
    }
}

/// Builds a transform from the source CRS into geographic WGS84 with
/// traditional lon/lat axis order.
fn wgs84_transform(source: &SpatialRef) -> gdal::errors::Result<CoordTransform> {
    let mut source = source.clone();
    source.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    let mut wgs84 = SpatialRef::from_epsg(4326)?;
    wgs84.set_axis_mapping_strategy(AxisMappingStrategy::TraditionalGisOrder);
    CoordTransform::new(&source, &wgs84)
}

/// Reprojects a geometry and converts it to its GeoJSON form.
fn to_geojson(
    geometry: &gdal::vector::Geometry,
    transform: &CoordTransform,
) -> Result<geojson::Geometry, String> {
    let reprojected = geometry.transform(transform).map_err(|e| e.to_string())?;
    let json = reprojected.json().map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

/// Maps a GDAL field value onto its JSON representation.
fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::IntegerValue(v) => v.into(),
        FieldValue::IntegerListValue(v) => v.into(),
        FieldValue::Integer64Value(v) => v.into(),
        FieldValue::Integer64ListValue(v) => v.into(),
        FieldValue::StringValue(v) => v.into(),
        FieldValue::StringListValue(v) => v.into(),
        FieldValue::RealValue(v) => v.into(),
        FieldValue::RealListValue(v) => v.into(),
        FieldValue::DateValue(v) => v.to_string().into(),
        FieldValue::DateTimeValue(v) => v.to_rfc3339().into(),
    }
}
