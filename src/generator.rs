//! Synthetic chunk contents
//!
//! The volume is an RGB colour cube: channel 0 ramps from 0 to 1 along x,
//! channel 1 along y and channel 2 along z. Values are normalised by the
//! scale-0 extent, so the same physical point gets the same value whichever
//! scale or chunk it is read through.

use crate::geometry::VolumeGeometry;
use crate::resolve::ChunkBox;
use crate::types::Axis;
use ndarray::{s, Array4, Axis as NdAxis};

/// One chunk in access order `[x, y, z, c]`
pub type ChunkBlock = Array4<f32>;

/// Allocate a zero-filled block with the geometry's block shape
pub fn empty_block(geometry: &VolumeGeometry) -> ChunkBlock {
    let [bx, by, bz, bc] = geometry.block_shape();
    Array4::zeros((bx, by, bz, bc))
}

/// Map a scale-0 coordinate onto `[0, 1]` along an axis of length `extent`
fn normalize(coord: usize, extent: usize) -> f64 {
    (coord as f64 / extent as f64).clamp(0.0, 1.0)
}

/// `len` evenly spaced values from `start` (inclusive) to `stop` (exclusive)
fn ramp(start: f64, stop: f64, len: usize) -> impl Iterator<Item = f32> {
    let step = if len == 0 {
        0.0
    } else {
        (stop - start) / len as f64
    };
    (0..len).map(move |i| (start + i as f64 * step) as f32)
}

/// Generate the contents of the chunk covering `chunk_box`.
///
/// Only the populated sub-rectangle is written; the rest of the block keeps
/// the zero fill value.
pub fn generate(chunk_box: &ChunkBox, geometry: &VolumeGeometry) -> ChunkBlock {
    let mut block = empty_block(geometry);
    if chunk_box.is_empty() {
        return block;
    }

    let base = geometry.base_shape();
    let [px, py, pz] = chunk_box.populated_region;

    for axis in Axis::SPATIAL {
        let c = axis.to_index();
        if c >= geometry.channels() {
            break;
        }

        let v0 = normalize(chunk_box.base_corner[c], base[c]);
        let v1 = normalize(chunk_box.base_extent[c], base[c]);

        let mut slab = block.slice_mut(s![..px, ..py, ..pz, c]);
        let len = chunk_box.populated_region[c];
        for (value, mut plane) in ramp(v0, v1, len).zip(slab.axis_iter_mut(NdAxis(c))) {
            plane.fill(value);
        }
    }

    block
}
