//! Error types for virtual N5 operations

use crate::types::DataType;
use thiserror::Error;

/// Main error type for virtual N5 operations
#[derive(Error, Debug)]
pub enum N5Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scale {scale}: dataset has scales 0..={max_scale}")]
    InvalidScale { scale: u32, max_scale: u32 },

    #[error("Invalid channel group {0}: every chunk covers all channels, only group 0 exists")]
    InvalidChannelGroup(u64),

    #[error("Unsupported data type {requested}: this dataset stores {expected}")]
    UnsupportedDataType {
        requested: DataType,
        expected: DataType,
    },

    #[error("Corrupt chunk header: {0}")]
    CorruptHeader(String),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Compression error: {0}")]
    Compression(String),

    #[error("Decompression error: {0}")]
    Decompression(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Specialized Result type for virtual N5 operations
pub type Result<T> = std::result::Result<T, N5Error>;

impl From<ndarray::ShapeError> for N5Error {
    fn from(err: ndarray::ShapeError) -> Self {
        N5Error::InvalidDimensions(err.to_string())
    }
}
