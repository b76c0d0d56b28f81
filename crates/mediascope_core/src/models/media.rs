//! Media asset descriptor.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::enums::MediaKind;

/// A media file handed to the pipeline by the caller.
///
/// Constructed before any analysis and never mutated by the pipeline.
/// The declared kind decides which engine and extension allow-list
/// apply; the pipeline does not sniff content to second-guess it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Filesystem path to the asset.
    pub path: PathBuf,
    /// Declared media kind.
    pub kind: MediaKind,
    /// File size in bytes at probe time.
    pub byte_size: u64,
    /// Lowercased extension including the dot (e.g. ".mp4").
    pub declared_format: String,
}

impl MediaAsset {
    /// Build an asset descriptor from a path, reading its size from disk.
    pub fn probe(path: impl Into<PathBuf>, kind: MediaKind) -> io::Result<Self> {
        let path = path.into();
        let byte_size = fs::metadata(&path)?.len();
        let declared_format = extension_of(&path);

        Ok(Self {
            path,
            kind,
            byte_size,
            declared_format,
        })
    }

    /// File size in megabytes.
    pub fn size_mb(&self) -> f64 {
        self.byte_size as f64 / (1024.0 * 1024.0)
    }
}

/// Lowercased extension with leading dot, or empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn probe_reads_size_and_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.MP4");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"0123456789").unwrap();

        let asset = MediaAsset::probe(&path, MediaKind::Video).unwrap();
        assert_eq!(asset.byte_size, 10);
        assert_eq!(asset.declared_format, ".mp4");
        assert_eq!(asset.kind, MediaKind::Video);
    }

    #[test]
    fn probe_missing_file_errors() {
        let result = MediaAsset::probe("/nonexistent/picture.png", MediaKind::Image);
        assert!(result.is_err());
    }

    #[test]
    fn size_mb_converts() {
        let asset = MediaAsset {
            path: PathBuf::from("a.png"),
            kind: MediaKind::Image,
            byte_size: 2 * 1024 * 1024,
            declared_format: ".png".to_string(),
        };
        assert!((asset.size_mb() - 2.0).abs() < f64::EPSILON);
    }
}
