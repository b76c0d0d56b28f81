//! Settings struct with TOML-based sections.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::logging::LogLevel;
use crate::models::{MediaAsset, MediaKind};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Per-kind extension allow-lists and size ceilings.
    #[serde(default)]
    pub validation: ValidationSettings,

    /// Face-detector model location and tuning.
    #[serde(default)]
    pub detection: DetectionSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Validation limits for incoming assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Allowed image extensions (lowercase, with dot).
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// Allowed video extensions (lowercase, with dot).
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Maximum image size in megabytes.
    #[serde(default = "default_image_max_mb")]
    pub image_max_mb: u64,

    /// Maximum video size in megabytes.
    #[serde(default = "default_video_max_mb")]
    pub video_max_mb: u64,
}

fn default_image_extensions() -> Vec<String> {
    [".jpg", ".jpeg", ".png", ".bmp", ".gif", ".tiff"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_video_extensions() -> Vec<String> {
    [".mp4", ".avi", ".mov", ".mkv", ".wmv", ".flv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_image_max_mb() -> u64 {
    20
}

fn default_video_max_mb() -> u64 {
    100
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
            video_extensions: default_video_extensions(),
            image_max_mb: default_image_max_mb(),
            video_max_mb: default_video_max_mb(),
        }
    }
}

impl ValidationSettings {
    /// Extension allow-list for the given kind.
    pub fn allowed_extensions(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Image => &self.image_extensions,
            MediaKind::Video => &self.video_extensions,
        }
    }

    /// Size ceiling in megabytes for the given kind.
    pub fn max_size_mb(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::Image => self.image_max_mb,
            MediaKind::Video => self.video_max_mb,
        }
    }

    /// Check existence, extension, and size. Cheap rejection before
    /// any decode is attempted.
    pub fn validate_asset(&self, asset: &MediaAsset) -> Result<(), AnalysisError> {
        if !asset.path.exists() {
            return Err(AnalysisError::invalid_input("File does not exist"));
        }

        let allowed = self.allowed_extensions(asset.kind);
        if !allowed
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(&asset.declared_format))
        {
            return Err(AnalysisError::invalid_input(format!(
                "Unsupported {} format '{}'",
                asset.kind, asset.declared_format
            )));
        }

        let max_mb = self.max_size_mb(asset.kind);
        let size_mb = asset.size_mb();
        if size_mb > max_mb as f64 {
            return Err(AnalysisError::invalid_input(format!(
                "File size ({:.1}MB) exceeds maximum allowed size ({}MB)",
                size_mb, max_mb
            )));
        }

        Ok(())
    }
}

/// Face-detector configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Path to the frontal-face cascade model file.
    #[serde(default = "default_face_model_path")]
    pub face_model_path: String,

    /// Minimum face size in pixels.
    #[serde(default = "default_min_face_size")]
    pub min_face_size: u32,

    /// Detection score threshold; higher values suppress weak matches.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
}

fn default_face_model_path() -> String {
    "models/seeta_fd_frontal_v1.0.bin".to_string()
}

fn default_min_face_size() -> u32 {
    20
}

fn default_score_threshold() -> f64 {
    2.0
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            face_model_path: default_face_model_path(),
            min_face_size: default_min_face_size(),
            score_threshold: default_score_threshold(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is unset.
    #[serde(default)]
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset(kind: MediaKind, format: &str, byte_size: u64, path: PathBuf) -> MediaAsset {
        MediaAsset {
            path,
            kind,
            byte_size,
            declared_format: format.to_string(),
        }
    }

    fn existing_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed.validation.image_max_mb, 20);
        assert_eq!(parsed.validation.video_max_mb, 100);
    }

    #[test]
    fn empty_toml_uses_section_defaults() {
        let parsed: Settings = toml::from_str("").unwrap();
        assert!(parsed.validation.video_extensions.contains(&".mkv".to_string()));
        assert_eq!(parsed.detection.min_face_size, 20);
    }

    #[test]
    fn rejects_missing_file() {
        let settings = ValidationSettings::default();
        let a = asset(MediaKind::Image, ".png", 1, PathBuf::from("/nonexistent/x.png"));
        let err = settings.validate_asset(&a).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir, "doc.xyz");
        let settings = ValidationSettings::default();
        let a = asset(MediaKind::Image, ".xyz", 1, path);
        let err = settings.validate_asset(&a).unwrap_err();
        assert!(err.to_string().contains("Unsupported image format"));
    }

    #[test]
    fn rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir, "big.png");
        let settings = ValidationSettings::default();
        let a = asset(MediaKind::Image, ".png", 25 * 1024 * 1024, path);
        let err = settings.validate_asset(&a).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("exceeds maximum"));
        assert!(msg.contains("25.0MB"));
    }

    #[test]
    fn accepts_valid_asset() {
        let dir = tempfile::tempdir().unwrap();
        let path = existing_file(&dir, "ok.jpg");
        let settings = ValidationSettings::default();
        let a = asset(MediaKind::Image, ".jpg", 1024, path);
        assert!(settings.validate_asset(&a).is_ok());
    }
}
