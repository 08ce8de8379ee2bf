//! Core data types for the virtual N5 dataset

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element types an N5 dataset can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Unsigned 8-bit integer
    Uint8,
    /// Unsigned 16-bit integer
    Uint16,
    /// Unsigned 32-bit integer
    Uint32,
    /// Unsigned 64-bit integer
    Uint64,
    /// Signed 8-bit integer
    Int8,
    /// Signed 16-bit integer
    Int16,
    /// Signed 32-bit integer
    Int32,
    /// Signed 64-bit integer
    Int64,
    /// 32-bit floating point
    Float32,
    /// 64-bit floating point
    Float64,
}

impl DataType {
    /// Size in bytes of this data type
    pub fn size_in_bytes(&self) -> usize {
        match self {
            DataType::Uint8 | DataType::Int8 => 1,
            DataType::Uint16 | DataType::Int16 => 2,
            DataType::Uint32 | DataType::Int32 | DataType::Float32 => 4,
            DataType::Uint64 | DataType::Int64 | DataType::Float64 => 8,
        }
    }

    /// Name used by the `dataType` attribute
    pub fn n5_name(&self) -> &'static str {
        match self {
            DataType::Uint8 => "uint8",
            DataType::Uint16 => "uint16",
            DataType::Uint32 => "uint32",
            DataType::Uint64 => "uint64",
            DataType::Int8 => "int8",
            DataType::Int16 => "int16",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.n5_name())
    }
}

/// A scalar that can be stored in a chunk.
///
/// N5 payloads are big-endian regardless of the host, so every element knows
/// how to write and read itself in that byte order.
pub trait Element: Copy + num_traits::Zero + Send + Sync + 'static {
    /// The tag this type is declared as in the dataset attributes
    const DATA_TYPE: DataType;

    /// Append the big-endian encoding of `self` to `out`
    fn write_be(&self, out: &mut Vec<u8>);

    /// Decode from exactly `DATA_TYPE.size_in_bytes()` big-endian bytes
    fn read_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_element {
    ($ty:ty, $tag:expr) => {
        impl Element for $ty {
            const DATA_TYPE: DataType = $tag;

            fn write_be(&self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            fn read_be(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_be_bytes(raw)
            }
        }
    };
}

impl_element!(u8, DataType::Uint8);
impl_element!(u16, DataType::Uint16);
impl_element!(u32, DataType::Uint32);
impl_element!(u64, DataType::Uint64);
impl_element!(i8, DataType::Int8);
impl_element!(i16, DataType::Int16);
impl_element!(i32, DataType::Int32);
impl_element!(i64, DataType::Int64);
impl_element!(f32, DataType::Float32);
impl_element!(f64, DataType::Float64);

/// Axes of the virtual volume, in access order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    /// Channel axis, always last
    C = 3,
}

impl Axis {
    /// The three spatial axes
    pub const SPATIAL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Convert to usize index
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    /// Lowercase axis name used in the attributes documents
    pub fn name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::C => "c",
        }
    }
}

/// Name, unit and physical resolution of one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisDescriptor {
    /// Name of the axis ("x", "y", "z", "c")
    pub name: String,
    /// Unit of measurement ("nm", or empty for channels)
    pub unit: String,
    /// Physical size of one voxel along this axis at scale 0
    pub resolution: f64,
}

impl AxisDescriptor {
    /// Create a new axis descriptor
    pub fn new(name: impl Into<String>, unit: impl Into<String>, resolution: f64) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            resolution,
        }
    }
}
