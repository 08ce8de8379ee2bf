//! N5 attributes documents describing the virtual dataset

use crate::compression::CompressionConfig;
use crate::error::Result;
use crate::geometry::{VolumeGeometry, NDIM};
use crate::types::{Axis, AxisDescriptor, DataType};
use serde::{Deserialize, Serialize};

/// Array ordering the attributes advertise
pub const ORDERING: &str = "C";

/// Physical size of a scale-0 voxel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelResolution {
    pub dimensions: Vec<f64>,
    pub unit: String,
}

/// The root `attributes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLevelAttributes {
    pub pixel_resolution: PixelResolution,
    pub ordering: String,
    /// Downsampling factors of every scale, `[2^s, 2^s, 2^s, 1]`
    pub scales: Vec<[u64; NDIM]>,
    pub axes: Vec<String>,
    pub units: Vec<String>,
    pub translate: [i64; NDIM],
}

/// Coordinate transform of one scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleTransform {
    pub ordering: String,
    pub axes: Vec<String>,
    pub scale: [u64; NDIM],
    pub units: Vec<String>,
    pub translate: [f64; 3],
}

/// The `s{scale}/attributes.json` of one pyramid level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleAttributes {
    pub transform: ScaleTransform,
    pub compression: CompressionConfig,
    pub block_size: [usize; NDIM],
    pub data_type: DataType,
    pub dimensions: [usize; NDIM],
}

/// Builds attributes documents from the geometry and axis descriptions
#[derive(Debug, Clone)]
pub struct MetadataProvider {
    geometry: VolumeGeometry,
    /// Spatial axes x, y, z
    axes: [AxisDescriptor; 3],
    data_type: DataType,
    compression: CompressionConfig,
}

impl MetadataProvider {
    pub fn new(
        geometry: VolumeGeometry,
        axes: [AxisDescriptor; 3],
        data_type: DataType,
        compression: CompressionConfig,
    ) -> Self {
        Self {
            geometry,
            axes,
            data_type,
            compression,
        }
    }

    fn axis_names() -> Vec<String> {
        [Axis::X, Axis::Y, Axis::Z, Axis::C]
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    fn spatial_units(&self) -> Vec<String> {
        self.axes.iter().map(|a| a.unit.clone()).collect()
    }

    fn downsampling(factor: u64) -> [u64; NDIM] {
        [factor, factor, factor, 1]
    }

    /// Root attributes: resolution, axes and the factor table of every scale
    pub fn top_level_attributes(&self) -> TopLevelAttributes {
        let mut dimensions: Vec<f64> = self.axes.iter().map(|a| a.resolution).collect();
        dimensions.push(1.0);

        let mut units = self.spatial_units();
        units.push(String::new());

        TopLevelAttributes {
            pixel_resolution: PixelResolution {
                dimensions,
                unit: self.axes[0].unit.clone(),
            },
            ordering: ORDERING.to_string(),
            scales: self
                .geometry
                .scales()
                .map(|s| Self::downsampling(1u64 << s))
                .collect(),
            axes: Self::axis_names(),
            units,
            translate: [0; NDIM],
        }
    }

    /// Attributes of one scale; fails with `InvalidScale` outside the pyramid
    pub fn scale_attributes(&self, scale: u32) -> Result<ScaleAttributes> {
        let factor = self.geometry.scale_factor(scale)? as u64;
        Ok(ScaleAttributes {
            transform: ScaleTransform {
                ordering: ORDERING.to_string(),
                axes: Self::axis_names(),
                scale: Self::downsampling(factor),
                units: self.spatial_units(),
                translate: [0.0; 3],
            },
            compression: self.compression,
            block_size: self.geometry.block_shape(),
            data_type: self.data_type,
            dimensions: self.geometry.scaled_shape(scale)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::N5Error;
    use serde_json::json;

    fn create_test_provider() -> MetadataProvider {
        let geometry =
            VolumeGeometry::new([10_000, 15_000, 20_000, 3], [128, 96, 64, 3], 9).unwrap();
        let axes = [
            AxisDescriptor::new("x", "nm", 1.0),
            AxisDescriptor::new("y", "nm", 1.0),
            AxisDescriptor::new("z", "nm", 1.0),
        ];
        MetadataProvider::new(
            geometry,
            axes,
            DataType::Float32,
            CompressionConfig::default(),
        )
    }

    #[test]
    fn test_top_level_document() {
        let provider = create_test_provider();
        let doc = serde_json::to_value(provider.top_level_attributes()).unwrap();

        assert_eq!(
            doc["pixelResolution"],
            json!({"dimensions": [1.0, 1.0, 1.0, 1.0], "unit": "nm"})
        );
        assert_eq!(doc["ordering"], "C");
        assert_eq!(doc["axes"], json!(["x", "y", "z", "c"]));
        assert_eq!(doc["units"], json!(["nm", "nm", "nm", ""]));
        assert_eq!(doc["translate"], json!([0, 0, 0, 0]));

        let scales = doc["scales"].as_array().unwrap();
        assert_eq!(scales.len(), 10);
        assert_eq!(scales[0], json!([1, 1, 1, 1]));
        assert_eq!(scales[9], json!([512, 512, 512, 1]));
    }

    #[test]
    fn test_scale_document() {
        let provider = create_test_provider();
        let doc = serde_json::to_value(provider.scale_attributes(2).unwrap()).unwrap();

        assert_eq!(
            doc,
            json!({
                "transform": {
                    "ordering": "C",
                    "axes": ["x", "y", "z", "c"],
                    "scale": [4, 4, 4, 1],
                    "units": ["nm", "nm", "nm"],
                    "translate": [0.0, 0.0, 0.0]
                },
                "compression": {"type": "gzip", "useZlib": false, "level": -1},
                "blockSize": [128, 96, 64, 3],
                "dataType": "float32",
                "dimensions": [2500, 3750, 5000, 3]
            })
        );
    }

    #[test]
    fn test_scale_document_invalid_scale() {
        let provider = create_test_provider();
        assert!(matches!(
            provider.scale_attributes(10),
            Err(N5Error::InvalidScale { .. })
        ));
    }

    #[test]
    fn test_documents_parse_back() {
        let provider = create_test_provider();
        let text = serde_json::to_string(&provider.scale_attributes(0).unwrap()).unwrap();
        let parsed: ScaleAttributes = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, provider.scale_attributes(0).unwrap());
    }
}
