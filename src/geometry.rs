//! Volume geometry - the shape of the multiscale pyramid and how it is cut into blocks

use crate::error::{N5Error, Result};
use serde::{Deserialize, Serialize};

/// Number of dimensions of every block: x, y, z and channel
pub const NDIM: usize = 4;

/// Index of the channel dimension
pub const CHANNEL_DIM: usize = 3;

/// Largest pyramid depth accepted; `2^scale` must fit in a 32-bit `usize`
pub const MAX_SUPPORTED_SCALE: u32 = 31;

/// Immutable description of the virtual dataset.
///
/// Shapes are listed in access order `[x, y, z, c]`. Per-scale shapes are
/// derived on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeGeometry {
    base_shape: [usize; NDIM],
    block_shape: [usize; NDIM],
    max_scale: u32,
}

impl VolumeGeometry {
    /// Create a new geometry, validating the block and volume shapes
    pub fn new(base_shape: [usize; NDIM], block_shape: [usize; NDIM], max_scale: u32) -> Result<Self> {
        if base_shape.iter().any(|&d| d == 0) {
            return Err(N5Error::InvalidDimensions(format!(
                "Volume shape must be positive in every dimension, got {:?}",
                base_shape
            )));
        }

        if block_shape.iter().any(|&d| d == 0) {
            return Err(N5Error::InvalidDimensions(format!(
                "Block shape must be positive in every dimension, got {:?}",
                block_shape
            )));
        }

        if block_shape[CHANNEL_DIM] != base_shape[CHANNEL_DIM] {
            return Err(N5Error::InvalidDimensions(format!(
                "Blocks must span all {} channels, got a channel extent of {}",
                base_shape[CHANNEL_DIM], block_shape[CHANNEL_DIM]
            )));
        }

        if max_scale > MAX_SUPPORTED_SCALE {
            return Err(N5Error::InvalidDimensions(format!(
                "Maximum scale must be <= {}, got {}",
                MAX_SUPPORTED_SCALE, max_scale
            )));
        }

        Ok(Self {
            base_shape,
            block_shape,
            max_scale,
        })
    }

    /// Dataset extent at scale 0, channel count included
    pub fn base_shape(&self) -> [usize; NDIM] {
        self.base_shape
    }

    /// Extent of one block
    pub fn block_shape(&self) -> [usize; NDIM] {
        self.block_shape
    }

    /// Highest scale level served
    pub fn max_scale(&self) -> u32 {
        self.max_scale
    }

    /// Number of channels
    pub fn channels(&self) -> usize {
        self.base_shape[CHANNEL_DIM]
    }

    /// All valid scale levels
    pub fn scales(&self) -> impl Iterator<Item = u32> {
        0..=self.max_scale
    }

    /// Fail with `InvalidScale` unless `scale` is part of the pyramid
    pub fn check_scale(&self, scale: u32) -> Result<()> {
        if scale > self.max_scale {
            return Err(N5Error::InvalidScale {
                scale,
                max_scale: self.max_scale,
            });
        }
        Ok(())
    }

    /// Downsampling factor of each spatial axis at `scale`, i.e. `2^scale`
    pub fn scale_factor(&self, scale: u32) -> Result<usize> {
        self.check_scale(scale)?;
        Ok(1usize << scale)
    }

    /// Dataset extent at `scale`; the channel extent never shrinks
    pub fn scaled_shape(&self, scale: u32) -> Result<[usize; NDIM]> {
        let factor = self.scale_factor(scale)?;
        let mut shape = self.base_shape;
        for dim in shape.iter_mut().take(CHANNEL_DIM) {
            *dim /= factor;
        }
        Ok(shape)
    }

    /// Number of blocks along each spatial axis at `scale`
    pub fn chunk_count(&self, scale: u32) -> Result<[usize; 3]> {
        let shape = self.scaled_shape(scale)?;
        let mut count = [0; 3];
        for (i, c) in count.iter_mut().enumerate() {
            *c = shape[i].div_ceil(self.block_shape[i]);
        }
        Ok(count)
    }

    /// Total number of blocks at `scale`
    pub fn total_chunks(&self, scale: u32) -> Result<usize> {
        Ok(self.chunk_count(scale)?.iter().product())
    }

    /// Number of voxels at `scale`, channels included
    pub fn total_voxels(&self, scale: u32) -> Result<u128> {
        Ok(self
            .scaled_shape(scale)?
            .iter()
            .map(|&d| d as u128)
            .product())
    }
}
