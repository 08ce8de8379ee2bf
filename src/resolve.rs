//! Chunk address resolution - maps a chunk request onto the region of the volume it covers

use crate::error::{N5Error, Result};
use crate::geometry::VolumeGeometry;
use serde::{Deserialize, Serialize};

/// A client request for one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkRequest {
    /// Pyramid level
    pub scale: u32,
    /// Block grid position along x, y, z
    pub chunk_index: [usize; 3],
    /// Channel group; only group 0 exists
    pub channel_group: u64,
}

impl ChunkRequest {
    /// Create a new chunk request
    pub fn new(scale: u32, chunk_index: [usize; 3], channel_group: u64) -> Self {
        Self {
            scale,
            chunk_index,
            channel_group,
        }
    }
}

/// The region of the volume a chunk covers.
///
/// `corner` and `clamped_extent` are in scaled voxel units; the `base_*`
/// fields hold the same box expressed in scale-0 voxels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBox {
    pub scale: u32,
    pub corner: [usize; 3],
    pub clamped_extent: [usize; 3],
    /// Length of the part of the block that lies inside the volume, per axis
    pub populated_region: [usize; 3],
    pub base_corner: [usize; 3],
    pub base_extent: [usize; 3],
}

impl ChunkBox {
    /// True when the chunk lies entirely outside the volume
    pub fn is_empty(&self) -> bool {
        self.populated_region.iter().any(|&len| len == 0)
    }

    /// True when the whole block lies inside the volume
    pub fn is_interior(&self, geometry: &VolumeGeometry) -> bool {
        let block = geometry.block_shape();
        self.populated_region
            .iter()
            .zip(block.iter())
            .all(|(&len, &b)| len == b)
    }

    /// Number of voxels inside the volume, per channel
    pub fn populated_voxels(&self) -> usize {
        self.populated_region.iter().product()
    }
}

/// Resolve a chunk request against the geometry.
///
/// Chunks that reach past the edge of the volume are clamped; chunks that lie
/// entirely outside it resolve to an empty populated region rather than an error.
pub fn resolve(geometry: &VolumeGeometry, request: &ChunkRequest) -> Result<ChunkBox> {
    if request.channel_group != 0 {
        return Err(N5Error::InvalidChannelGroup(request.channel_group));
    }

    let shape = geometry.scaled_shape(request.scale)?;
    let factor = geometry.scale_factor(request.scale)?;
    let block = geometry.block_shape();

    let mut chunk_box = ChunkBox {
        scale: request.scale,
        corner: [0; 3],
        clamped_extent: [0; 3],
        populated_region: [0; 3],
        base_corner: [0; 3],
        base_extent: [0; 3],
    };

    for axis in 0..3 {
        let corner = block[axis].saturating_mul(request.chunk_index[axis]);
        let extent = corner.saturating_add(block[axis]).min(shape[axis]);

        chunk_box.corner[axis] = corner;
        chunk_box.clamped_extent[axis] = extent;
        chunk_box.populated_region[axis] = extent.saturating_sub(corner);
        chunk_box.base_corner[axis] = corner.saturating_mul(factor);
        chunk_box.base_extent[axis] = extent.saturating_mul(factor);
    }

    Ok(chunk_box)
}
