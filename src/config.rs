//! Server and dataset configuration

use crate::compression::CompressionConfig;
use crate::error::{N5Error, Result};
use crate::geometry::{VolumeGeometry, NDIM};
use crate::types::{AxisDescriptor, DataType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description of the virtual dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Extent at scale 0 as `[x, y, z, channels]`
    pub base_shape: [usize; NDIM],
    /// Extent of one block; the channel extent must equal the channel count
    pub block_shape: [usize; NDIM],
    /// Highest pyramid level
    pub max_scale: u32,
    /// Physical voxel size along x, y, z at scale 0
    pub resolution: [f64; 3],
    /// Unit of `resolution`
    pub unit: String,
    pub data_type: DataType,
    pub compression: CompressionConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        // An RGB volume of 3 teravoxels per channel
        Self {
            base_shape: [10_000, 15_000, 20_000, 3],
            block_shape: [128, 96, 64, 3],
            max_scale: 9,
            resolution: [1.0, 1.0, 1.0],
            unit: "nm".to_string(),
            data_type: DataType::Float32,
            compression: CompressionConfig::default(),
        }
    }
}

impl DatasetConfig {
    /// Validated geometry of the dataset
    pub fn geometry(&self) -> Result<VolumeGeometry> {
        VolumeGeometry::new(self.base_shape, self.block_shape, self.max_scale)
    }

    /// Descriptors of the spatial axes
    pub fn axes(&self) -> [AxisDescriptor; 3] {
        let [rx, ry, rz] = self.resolution;
        [
            AxisDescriptor::new("x", self.unit.clone(), rx),
            AxisDescriptor::new("y", self.unit.clone(), ry),
            AxisDescriptor::new("z", self.unit.clone(), rz),
        ]
    }

    /// Check everything that `VolumeGeometry::new` does not
    pub fn validate(&self) -> Result<()> {
        self.geometry()?;

        if self.data_type != DataType::Float32 {
            return Err(N5Error::Configuration(format!(
                "The synthetic gradient is float32, cannot serve {}",
                self.data_type
            )));
        }

        if self
            .resolution
            .iter()
            .any(|r| !r.is_finite() || *r <= 0.0)
        {
            return Err(N5Error::Configuration(format!(
                "Resolution must be positive and finite, got {:?}",
                self.resolution
            )));
        }

        if let CompressionConfig::Zstd { level } = self.compression {
            let range = zstd::compression_level_range();
            if !range.contains(&level) {
                return Err(N5Error::Configuration(format!(
                    "zstd level must be in {}..={}, got {}",
                    range.start(),
                    range.end(),
                    level
                )));
            }
        }

        Ok(())
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub dataset: DatasetConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            dataset: DatasetConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| {
            N5Error::Configuration(format!("{}: {}", path.display(), e))
        })
    }

    /// Address to bind, e.g. `0.0.0.0:8000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
