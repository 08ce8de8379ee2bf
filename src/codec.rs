//! N5 chunk codec
//!
//! A chunk on the wire is a big-endian header followed by the compressed
//! payload:
//!
//! | field  | type        | value                                  |
//! |--------|-------------|----------------------------------------|
//! | mode   | `u16`       | `0` (default mode)                     |
//! | ndim   | `u16`       | `4`                                    |
//! | shape  | `u32 * ndim`| block extents in access order `x,y,z,c`|
//!
//! Blocks are held in access order `[x, y, z, c]`. The payload is in storage
//! order `[c, z, y, x]` with x varying fastest, every element big-endian.

use crate::compression::{CompressionMethod, Compressor};
use crate::error::{N5Error, Result};
use crate::geometry::NDIM;
use crate::types::{DataType, Element};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use ndarray::{Array4, ArrayView4};
use std::sync::Arc;

/// Mode of a plain block; varlength and object modes are never produced
pub const DEFAULT_MODE: u16 = 0;

/// Parsed chunk header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkHeader {
    pub mode: u16,
    /// Block extents in access order
    pub shape: Vec<u32>,
}

impl ChunkHeader {
    /// Header for a default-mode block of `shape`
    pub fn new(shape: &[usize]) -> Result<Self> {
        let shape = shape
            .iter()
            .map(|&d| {
                u32::try_from(d).map_err(|_| {
                    N5Error::InvalidDimensions(format!("Block extent {} does not fit in u32", d))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            mode: DEFAULT_MODE,
            shape,
        })
    }

    /// Encoded size of the header in bytes
    pub fn encoded_len(&self) -> usize {
        2 * std::mem::size_of::<u16>() + self.shape.len() * std::mem::size_of::<u32>()
    }

    /// Append the encoded header to `buf`
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_u16(self.mode);
        buf.put_u16(self.shape.len() as u16);
        for &d in &self.shape {
            buf.put_u32(d);
        }
    }

    /// Parse a header from the start of `bytes`
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        if bytes.remaining() < 2 * std::mem::size_of::<u16>() {
            return Err(N5Error::CorruptHeader("truncated header".to_string()));
        }

        let mode = bytes.get_u16();
        if mode != DEFAULT_MODE {
            return Err(N5Error::CorruptHeader(format!(
                "unsupported chunk mode {}",
                mode
            )));
        }

        let ndim = bytes.get_u16() as usize;
        if bytes.remaining() < ndim * std::mem::size_of::<u32>() {
            return Err(N5Error::CorruptHeader("truncated block shape".to_string()));
        }
        let shape = (0..ndim).map(|_| bytes.get_u32()).collect();

        Ok(Self { mode, shape })
    }
}

/// Flatten an access-order block into storage order (x fastest, channel slowest)
pub fn to_storage_order<T: Element>(block: ArrayView4<'_, T>) -> Vec<T> {
    block.reversed_axes().iter().copied().collect()
}

/// Rebuild an access-order block from storage-order elements
pub fn from_storage_order<T: Element>(values: Vec<T>, shape: [usize; NDIM]) -> Result<Array4<T>> {
    let [x, y, z, c] = shape;
    let storage = Array4::from_shape_vec((c, z, y, x), values)?;
    Ok(storage.reversed_axes().as_standard_layout().into_owned())
}

/// Encodes and decodes blocks of one fixed shape and element type
#[derive(Clone)]
pub struct ChunkCodec {
    data_type: DataType,
    block_shape: [usize; NDIM],
    compressor: Arc<dyn Compressor>,
}

impl std::fmt::Debug for ChunkCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkCodec")
            .field("data_type", &self.data_type)
            .field("block_shape", &self.block_shape)
            .field("compression", &self.compression_method())
            .finish()
    }
}

impl ChunkCodec {
    /// Create a codec for blocks of `block_shape` holding `data_type` elements
    pub fn new(data_type: DataType, block_shape: [usize; NDIM], compressor: Arc<dyn Compressor>) -> Self {
        Self {
            data_type,
            block_shape,
            compressor,
        }
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn block_shape(&self) -> [usize; NDIM] {
        self.block_shape
    }

    pub fn compression_method(&self) -> CompressionMethod {
        self.compressor.method()
    }

    /// Size of an uncompressed payload
    pub fn payload_len(&self) -> usize {
        self.block_shape.iter().product::<usize>() * self.data_type.size_in_bytes()
    }

    fn check_type<T: Element>(&self) -> Result<()> {
        if T::DATA_TYPE != self.data_type {
            return Err(N5Error::UnsupportedDataType {
                requested: T::DATA_TYPE,
                expected: self.data_type,
            });
        }
        Ok(())
    }

    /// Encode a block into the wire format
    pub fn encode<T: Element>(&self, block: ArrayView4<'_, T>) -> Result<Bytes> {
        self.check_type::<T>()?;
        if block.shape() != self.block_shape {
            return Err(N5Error::InvalidDimensions(format!(
                "Block shape {:?} does not match codec shape {:?}",
                block.shape(),
                self.block_shape
            )));
        }

        let header = ChunkHeader::new(&self.block_shape)?;

        let mut payload = Vec::with_capacity(self.payload_len());
        for value in to_storage_order(block) {
            value.write_be(&mut payload);
        }
        let compressed = self.compressor.compress(&payload)?;

        let mut buf = BytesMut::with_capacity(header.encoded_len() + compressed.len());
        header.write_to(&mut buf);
        buf.put_slice(&compressed);
        Ok(buf.freeze())
    }

    /// Decode a wire-format chunk back into an access-order block
    pub fn decode<T: Element>(&self, bytes: &[u8]) -> Result<Array4<T>> {
        self.check_type::<T>()?;

        let header = ChunkHeader::from_bytes(bytes)?;
        let expected = ChunkHeader::new(&self.block_shape)?;
        if header.shape != expected.shape {
            return Err(N5Error::CorruptHeader(format!(
                "declared block shape {:?}, expected {:?}",
                header.shape, expected.shape
            )));
        }

        let payload_len = self.payload_len();
        let payload = self
            .compressor
            .decompress(&bytes[header.encoded_len()..], Some(payload_len))?;
        if payload.len() != payload_len {
            return Err(N5Error::Decompression(format!(
                "payload has {} bytes, expected {}",
                payload.len(),
                payload_len
            )));
        }

        let values = payload
            .chunks_exact(self.data_type.size_in_bytes())
            .map(T::read_be)
            .collect();
        from_storage_order(values, self.block_shape)
    }
}
