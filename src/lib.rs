//! Virtual N5 - a multiscale volume that exists only on the wire
//!
//! Serves an N5 dataset, suitable for browsing in neuroglancer, without
//! storing a single voxel. Attribute documents are derived from the configured
//! geometry and every chunk is synthesized on request from a closed-form
//! colour gradient, then encoded into the N5 block format.
//!
//! # Features
//!
//! - Multiscale pyramid with `2^s` downsampling per scale
//! - Boundary chunks clamped to the true volume extent, zero padded
//! - Gradient values continuous across chunk and scale boundaries
//! - N5 default-mode blocks with raw, gzip, zlib or zstd payloads
//! - Stateless request handling, safe to call from any number of threads
//!
//! # Example
//!
//! ```rust
//! use virtual_n5::{ChunkRequest, DatasetConfig, VirtualVolume};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let volume = VirtualVolume::new(&DatasetConfig::default())?;
//!
//! // The bytes served at s0/0/0/0/0
//! let chunk = volume.read_chunk(&ChunkRequest::new(0, [0, 0, 0], 0))?;
//! let block: ndarray::Array4<f32> = volume.codec().decode(&chunk)?;
//! assert_eq!(block[[0, 0, 0, 0]], 0.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod compression;
pub mod config;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod metadata;
pub mod resolve;
pub mod server;
pub mod types;
pub mod utils;
pub mod volume;

// Re-exports
pub use codec::ChunkCodec;
pub use compression::{CompressionConfig, CompressionMethod, Compressor};
pub use config::{DatasetConfig, ServerConfig};
pub use error::{N5Error, Result};
pub use generator::ChunkBlock;
pub use geometry::VolumeGeometry;
pub use metadata::{ScaleAttributes, TopLevelAttributes};
pub use resolve::{resolve, ChunkBox, ChunkRequest};
pub use types::{Axis, AxisDescriptor, DataType, Element};
pub use volume::VirtualVolume;

/// Version of the virtual N5 server
pub const VIRTUAL_N5_VERSION: &str = env!("CARGO_PKG_VERSION");
