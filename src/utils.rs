//! Utility functions

use crate::error::{N5Error, Result};
use crate::resolve::ChunkRequest;

/// Format byte size in human-readable form
pub fn format_bytes(bytes: u128) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

/// Directory name of a scale level, e.g. `s3`
pub fn scale_dir(scale: u32) -> String {
    format!("s{}", scale)
}

/// Relative path of a chunk within the dataset, e.g. `s0/1/2/3/0`
pub fn chunk_path(request: &ChunkRequest) -> String {
    let [cx, cy, cz] = request.chunk_index;
    format!(
        "{}/{}/{}/{}/{}",
        scale_dir(request.scale),
        cx,
        cy,
        cz,
        request.channel_group
    )
}

/// Parse a scale directory name such as `s3` back into its level
pub fn parse_scale_dir(segment: &str) -> Result<u32> {
    segment
        .strip_prefix('s')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| N5Error::InvalidPath(format!("not a scale directory: {}", segment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_chunk_path() {
        assert_eq!(chunk_path(&ChunkRequest::new(0, [0, 0, 0], 0)), "s0/0/0/0/0");
        assert_eq!(chunk_path(&ChunkRequest::new(3, [12, 4, 77], 0)), "s3/12/4/77/0");
    }

    #[test]
    fn test_parse_scale_dir() {
        assert_eq!(parse_scale_dir("s0").unwrap(), 0);
        assert_eq!(parse_scale_dir("s12").unwrap(), 12);
        assert_eq!(parse_scale_dir(&scale_dir(7)).unwrap(), 7);

        for bad in ["", "s", "3", "s-1", "s+1", "x3", "s3a", "s99999999999"] {
            assert!(
                matches!(parse_scale_dir(bad), Err(N5Error::InvalidPath(_))),
                "{}",
                bad
            );
        }
    }
}
