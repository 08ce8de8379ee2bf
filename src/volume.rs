//! Virtual volume - main API for answering attribute and chunk requests

use crate::codec::ChunkCodec;
use crate::compression::{get_compressor, CompressionMethod};
use crate::config::DatasetConfig;
use crate::error::Result;
use crate::generator::generate;
use crate::geometry::VolumeGeometry;
use crate::metadata::{MetadataProvider, ScaleAttributes, TopLevelAttributes};
use crate::resolve::{resolve, ChunkRequest};
use crate::types::DataType;
use crate::utils::{chunk_path, format_bytes};
use bytes::Bytes;
use tracing::debug;

/// Everything needed to serve the virtual dataset.
///
/// Built once at startup and shared read-only between requests; every method
/// takes `&self` and allocates only request-local buffers.
#[derive(Debug, Clone)]
pub struct VirtualVolume {
    geometry: VolumeGeometry,
    codec: ChunkCodec,
    metadata: MetadataProvider,
}

impl VirtualVolume {
    /// Build a volume from a validated dataset configuration
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        config.validate()?;
        let geometry = config.geometry()?;

        let codec = ChunkCodec::new(
            config.data_type,
            geometry.block_shape(),
            get_compressor(&config.compression),
        );
        let metadata = MetadataProvider::new(
            geometry,
            config.axes(),
            config.data_type,
            config.compression,
        );

        Ok(Self {
            geometry,
            codec,
            metadata,
        })
    }

    /// Get the volume geometry
    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    /// Get the chunk codec
    pub fn codec(&self) -> &ChunkCodec {
        &self.codec
    }

    /// The root `attributes.json` document
    pub fn top_level_attributes(&self) -> TopLevelAttributes {
        self.metadata.top_level_attributes()
    }

    /// The `s{scale}/attributes.json` document
    pub fn scale_attributes(&self, scale: u32) -> Result<ScaleAttributes> {
        self.metadata.scale_attributes(scale)
    }

    /// Number of chunks along x, y, z at `scale`
    pub fn chunk_count(&self, scale: u32) -> Result<[usize; 3]> {
        self.geometry.chunk_count(scale)
    }

    /// Generate and encode one chunk.
    ///
    /// Fails before generating anything if the request is invalid; chunks
    /// outside the volume come back as all-zero blocks.
    pub fn read_chunk(&self, request: &ChunkRequest) -> Result<Bytes> {
        let chunk_box = resolve(&self.geometry, request)?;
        let block = generate(&chunk_box, &self.geometry);
        let encoded = self.codec.encode(block.view())?;

        debug!(
            chunk = %chunk_path(request),
            populated = ?chunk_box.populated_region,
            size = %format_bytes(encoded.len() as u128),
            "generated chunk"
        );

        Ok(encoded)
    }

    /// Get statistics about the volume
    pub fn stats(&self) -> VolumeStats {
        let scales = self
            .geometry
            .scales()
            .filter_map(|scale| {
                Some(ScaleStats {
                    scale,
                    shape: self.geometry.scaled_shape(scale).ok()?,
                    chunks: self.geometry.total_chunks(scale).ok()?,
                    voxels: self.geometry.total_voxels(scale).ok()?,
                })
            })
            .collect();

        VolumeStats {
            block_shape: self.geometry.block_shape(),
            data_type: self.codec.data_type(),
            compression_method: self.codec.compression_method(),
            scales,
        }
    }
}

/// Per-scale statistics
#[derive(Debug, Clone)]
pub struct ScaleStats {
    pub scale: u32,
    pub shape: [usize; 4],
    pub chunks: usize,
    pub voxels: u128,
}

/// Volume statistics
#[derive(Debug, Clone)]
pub struct VolumeStats {
    pub block_shape: [usize; 4],
    pub data_type: DataType,
    pub compression_method: CompressionMethod,
    pub scales: Vec<ScaleStats>,
}

impl VolumeStats {
    /// Virtual uncompressed size of all scales together
    pub fn uncompressed_size(&self) -> u128 {
        self.scales.iter().map(|s| s.voxels).sum::<u128>() * self.data_type.size_in_bytes() as u128
    }

    pub fn summary(&self) -> String {
        let base = self.scales.first().map(|s| s.shape).unwrap_or_default();
        format!(
            "{} x {} x {} x {} volume, {} scales, blocks of {:?}, {} virtual ({}, {:?})",
            base[0],
            base[1],
            base[2],
            base[3],
            self.scales.len(),
            self.block_shape,
            format_bytes(self.uncompressed_size()),
            self.data_type,
            self.compression_method,
        )
    }
}
