//! Compression strategies for chunk payloads

use crate::error::{N5Error, Result};
use flate2::read::{GzDecoder, GzEncoder, ZlibDecoder, ZlibEncoder};
use flate2::Compression as FlateCompression;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

/// Compression methods an N5 dataset can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionMethod {
    /// No compression
    Raw,
    /// Deflate in a gzip container
    Gzip,
    /// Deflate in a zlib container
    Zlib,
    /// Zstandard compression
    Zstd,
}

/// Gzip/zlib compression level.
///
/// `-1` selects the library default, matching the N5 attribute convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct CompressionLevel(i32);

impl CompressionLevel {
    pub const DEFAULT: Self = Self(-1);

    pub fn new(level: i32) -> Self {
        Self(level.clamp(-1, 9))
    }

    pub fn fast() -> Self {
        Self(1)
    }

    pub fn best() -> Self {
        Self(9)
    }

    fn to_flate(self) -> FlateCompression {
        if self.0 < 0 {
            FlateCompression::default()
        } else {
            FlateCompression::new(self.0 as u32)
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = N5Error;

    fn try_from(level: i32) -> Result<Self> {
        if !(-1..=9).contains(&level) {
            return Err(N5Error::Configuration(format!(
                "gzip level must be in -1..=9, got {}",
                level
            )));
        }
        Ok(Self(level))
    }
}

impl From<CompressionLevel> for i32 {
    fn from(level: CompressionLevel) -> Self {
        level.0
    }
}

fn default_zstd_level() -> i32 {
    3
}

/// The `compression` descriptor of a scale's attributes.
///
/// Serializes exactly as N5 expects, e.g. `{"type":"gzip","useZlib":false,"level":-1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CompressionConfig {
    Raw,
    Gzip {
        #[serde(rename = "useZlib", default)]
        use_zlib: bool,
        #[serde(default)]
        level: CompressionLevel,
    },
    Zstd {
        #[serde(default = "default_zstd_level")]
        level: i32,
    },
}

impl CompressionConfig {
    /// The method this descriptor selects
    pub fn method(&self) -> CompressionMethod {
        match self {
            CompressionConfig::Raw => CompressionMethod::Raw,
            CompressionConfig::Gzip { use_zlib: false, .. } => CompressionMethod::Gzip,
            CompressionConfig::Gzip { use_zlib: true, .. } => CompressionMethod::Zlib,
            CompressionConfig::Zstd { .. } => CompressionMethod::Zstd,
        }
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        CompressionConfig::Gzip {
            use_zlib: false,
            level: CompressionLevel::DEFAULT,
        }
    }
}

/// Trait for compression/decompression operations.
///
/// Implementations are stateless and shared between concurrent requests.
pub trait Compressor: Send + Sync {
    /// Compress data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress data
    fn decompress(&self, data: &[u8], expected_size: Option<usize>) -> Result<Vec<u8>>;

    /// Get the compression method
    fn method(&self) -> CompressionMethod;
}

/// No compression
#[derive(Debug, Default)]
pub struct RawCompressor;

impl Compressor for RawCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn decompress(&self, data: &[u8], _expected_size: Option<usize>) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    fn method(&self) -> CompressionMethod {
        CompressionMethod::Raw
    }
}

/// Read `reader` to the end, stopping one byte past `expected_size` when given
fn read_all(reader: impl Read, expected_size: Option<usize>) -> std::io::Result<Vec<u8>> {
    let limit = expected_size.map_or(u64::MAX, |size| (size as u64).saturating_add(1));
    let mut out = Vec::with_capacity(expected_size.unwrap_or_default());
    reader.take(limit).read_to_end(&mut out)?;
    Ok(out)
}

/// Gzip compression
#[derive(Debug, Default)]
pub struct GzipCompressor {
    level: CompressionLevel,
}

impl GzipCompressor {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }
}

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        read_all(GzEncoder::new(data, self.level.to_flate()), None)
            .map_err(|e| N5Error::Compression(e.to_string()))
    }

    fn decompress(&self, data: &[u8], expected_size: Option<usize>) -> Result<Vec<u8>> {
        read_all(GzDecoder::new(data), expected_size)
            .map_err(|e| N5Error::Decompression(e.to_string()))
    }

    fn method(&self) -> CompressionMethod {
        CompressionMethod::Gzip
    }
}

/// Zlib compression
#[derive(Debug, Default)]
pub struct ZlibCompressor {
    level: CompressionLevel,
}

impl ZlibCompressor {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }
}

impl Compressor for ZlibCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        read_all(ZlibEncoder::new(data, self.level.to_flate()), None)
            .map_err(|e| N5Error::Compression(e.to_string()))
    }

    fn decompress(&self, data: &[u8], expected_size: Option<usize>) -> Result<Vec<u8>> {
        read_all(ZlibDecoder::new(data), expected_size)
            .map_err(|e| N5Error::Decompression(e.to_string()))
    }

    fn method(&self) -> CompressionMethod {
        CompressionMethod::Zlib
    }
}

/// Zstandard compression
#[derive(Debug)]
pub struct ZstdCompressor {
    level: i32,
}

impl ZstdCompressor {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

impl Default for ZstdCompressor {
    fn default() -> Self {
        Self::new(default_zstd_level())
    }
}

impl Compressor for ZstdCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::encode_all(data, self.level).map_err(|e| N5Error::Compression(e.to_string()))
    }

    fn decompress(&self, data: &[u8], expected_size: Option<usize>) -> Result<Vec<u8>> {
        zstd::stream::read::Decoder::new(data)
            .and_then(|decoder| read_all(decoder, expected_size))
            .map_err(|e| N5Error::Decompression(e.to_string()))
    }

    fn method(&self) -> CompressionMethod {
        CompressionMethod::Zstd
    }
}

/// Get a compressor for a given descriptor
pub fn get_compressor(config: &CompressionConfig) -> Arc<dyn Compressor> {
    match *config {
        CompressionConfig::Raw => Arc::new(RawCompressor),
        CompressionConfig::Gzip {
            use_zlib: false,
            level,
        } => Arc::new(GzipCompressor::new(level)),
        CompressionConfig::Gzip {
            use_zlib: true,
            level,
        } => Arc::new(ZlibCompressor::new(level)),
        CompressionConfig::Zstd { level } => Arc::new(ZstdCompressor::new(level)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw() {
        let compressor = RawCompressor;
        let data = b"Hello, world!";
        let compressed = compressor.compress(data).unwrap();
        assert_eq!(compressed, data);
        let decompressed = compressor.decompress(&compressed, None).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_gzip() {
        let compressor = GzipCompressor::default();
        let data = b"Hello, world! ".repeat(100);
        let compressed = compressor.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        // gzip magic bytes
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
        let decompressed = compressor
            .decompress(&compressed, Some(data.len()))
            .unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_gzip_is_deterministic() {
        let compressor = GzipCompressor::new(CompressionLevel::fast());
        let data = vec![7u8; 4096];
        assert_eq!(
            compressor.compress(&data).unwrap(),
            compressor.compress(&data).unwrap()
        );
    }

    #[test]
    fn test_zlib() {
        let compressor = ZlibCompressor::new(CompressionLevel::best());
        let data = b"Hello, world! ".repeat(100);
        let compressed = compressor.compress(&data).unwrap();
        assert_eq!(compressed[0], 0x78);
        let decompressed = compressor.decompress(&compressed, None).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_zstd() {
        let compressor = ZstdCompressor::default();
        let data = b"Hello, world! ".repeat(100);
        let compressed = compressor.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        let decompressed = compressor.decompress(&compressed, None).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_decompress_stops_past_expected_size() {
        let data = vec![0u8; 1 << 20];
        let gzip = GzipCompressor::default();
        let zstd = ZstdCompressor::default();

        let inflated = gzip.decompress(&gzip.compress(&data).unwrap(), Some(16)).unwrap();
        assert_eq!(inflated.len(), 17);
        let inflated = zstd.decompress(&zstd.compress(&data).unwrap(), Some(16)).unwrap();
        assert_eq!(inflated.len(), 17);

        let full = gzip.decompress(&gzip.compress(&data).unwrap(), None).unwrap();
        assert_eq!(full.len(), data.len());
    }

    #[test]
    fn test_gzip_level_out_of_range_rejected() {
        let result: serde_json::Result<CompressionConfig> =
            serde_json::from_str(r#"{"type":"gzip","level":42}"#);
        assert!(result.is_err());
        let result: serde_json::Result<CompressionConfig> =
            serde_json::from_str(r#"{"type":"gzip","level":-2}"#);
        assert!(result.is_err());

        let best: CompressionConfig = serde_json::from_str(r#"{"type":"gzip","level":9}"#).unwrap();
        assert_eq!(
            best,
            CompressionConfig::Gzip {
                use_zlib: false,
                level: CompressionLevel::best()
            }
        );
        assert!(CompressionLevel::try_from(10).is_err());
        assert_eq!(CompressionLevel::new(42), CompressionLevel::best());
    }

    #[test]
    fn test_corrupt_gzip_fails() {
        let compressor = GzipCompressor::default();
        let result = compressor.decompress(b"definitely not gzip", None);
        assert!(matches!(result, Err(N5Error::Decompression(_))));
    }

    #[test]
    fn test_descriptor_json() {
        let json = serde_json::to_value(CompressionConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "gzip", "useZlib": false, "level": -1})
        );

        let raw: CompressionConfig = serde_json::from_str(r#"{"type":"raw"}"#).unwrap();
        assert_eq!(raw, CompressionConfig::Raw);

        let zstd: CompressionConfig = serde_json::from_str(r#"{"type":"zstd"}"#).unwrap();
        assert_eq!(zstd, CompressionConfig::Zstd { level: 3 });
    }

    #[test]
    fn test_get_compressor() {
        let zlib = CompressionConfig::Gzip {
            use_zlib: true,
            level: CompressionLevel::new(5),
        };
        assert_eq!(get_compressor(&zlib).method(), CompressionMethod::Zlib);
        assert_eq!(
            get_compressor(&CompressionConfig::default()).method(),
            CompressionMethod::Gzip
        );
        assert_eq!(
            get_compressor(&CompressionConfig::Raw).method(),
            CompressionMethod::Raw
        );
    }
}
