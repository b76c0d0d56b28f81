//! Still-image analysis engine.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::run_stage;
use crate::analyzers::color::profile_colors;
use crate::analyzers::round2;
use crate::analyzers::contours::detect_objects;
use crate::analyzers::edges::profile_edges;
use crate::analyzers::faces::FaceDetector;
use crate::analyzers::quality::assess_quality;
use crate::config::Settings;
use crate::error::{AnalysisError, AnalysisResult};
use crate::frames::source::open_source;
use crate::frames::Frame;
use crate::models::{AnalysisReport, ImageInfo, ImageSections, MediaAsset};

/// Composes the five frame-level analyzers for a single still image.
///
/// The engine is a per-invocation value: analyzing independent assets
/// concurrently means one engine per worker, and the only state shared
/// between them is the lazily-discovered face model, which is
/// immutable after initialization.
pub struct ImageAnalysisEngine {
    settings: Settings,
    face_detector: FaceDetector,
}

impl ImageAnalysisEngine {
    /// Create an engine; face-detection capability is resolved here,
    /// not per call.
    pub fn new(settings: Settings) -> Self {
        let face_detector = FaceDetector::new(&settings.detection);
        Self {
            settings,
            face_detector,
        }
    }

    /// Engine with default settings.
    pub fn with_defaults() -> Self {
        Self::new(Settings::default())
    }

    /// Analyze one still image.
    ///
    /// Always returns a well-shaped report; `success` is false only
    /// when validation or decode failed.
    pub fn analyze(&mut self, asset: &MediaAsset) -> AnalysisReport {
        tracing::info!("[ImageEngine] Analyzing {}", asset.path.display());

        if let Err(e) = self.settings.validation.validate_asset(asset) {
            tracing::warn!("[ImageEngine] Validation failed: {}", e);
            return AnalysisReport::failure(e.to_string());
        }

        let mut source = match open_source(asset, &self.settings.validation) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("[ImageEngine] Open failed: {}", e);
                return AnalysisReport::failure(e.to_string());
            }
        };

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return AnalysisReport::failure("Could not load image"),
            Err(e) => return AnalysisReport::failure(e.to_string()),
        };

        let sections = ImageSections {
            basic_info: run_stage("basic_info", || Ok(image_info(asset, &frame))),
            color_analysis: run_stage("color_analysis", || Ok(profile_colors(&frame))),
            edge_detection: run_stage("edge_detection", || Ok(profile_edges(&frame))),
            face_detection: run_stage("face_detection", || Ok(self.face_detector.detect(&frame))),
            object_detection: run_stage("object_detection", || Ok(detect_objects(&frame))),
            image_quality: run_stage("image_quality", || Ok(assess_quality(&frame))),
        };

        drop(source);

        AnalysisReport::image(asset.path.clone(), sections)
    }

    /// Resize an image to the given dimensions.
    pub fn resize(
        &self,
        input: &Path,
        output: &Path,
        width: u32,
        height: u32,
    ) -> AnalysisResult<ResizeResult> {
        let decoded = decode(input)?;
        let original_size = format!("{}x{}", decoded.width(), decoded.height());

        let resized = image::imageops::resize(
            &decoded,
            width,
            height,
            image::imageops::FilterType::Triangle,
        );
        save(&resized, output)?;

        Ok(ResizeResult {
            original_size,
            new_size: format!("{}x{}", width, height),
            output_path: output.to_path_buf(),
        })
    }

    /// Re-encode an image in the format implied by the output extension.
    pub fn convert_format(&self, input: &Path, output: &Path) -> AnalysisResult<ConvertResult> {
        let decoded = decode(input)?;
        save(&decoded, output)?;

        Ok(ConvertResult {
            input_format: extension_str(input),
            output_format: extension_str(output),
            output_path: output.to_path_buf(),
        })
    }
}

/// Result of a resize operation.
#[derive(Debug, Clone, Serialize)]
pub struct ResizeResult {
    pub original_size: String,
    pub new_size: String,
    pub output_path: PathBuf,
}

/// Result of a format conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub input_format: String,
    pub output_format: String,
    pub output_path: PathBuf,
}

fn image_info(asset: &MediaAsset, frame: &Frame) -> ImageInfo {
    let (width, height) = frame.dimensions();
    let aspect_ratio = if height > 0 {
        round2(width as f64 / height as f64)
    } else {
        0.0
    };

    ImageInfo {
        dimensions: format!("{}x{}", width, height),
        width,
        height,
        channels: 3,
        color_space: "RGB".to_string(),
        file_size_bytes: asset.byte_size,
        file_size_mb: round2(asset.size_mb()),
        aspect_ratio,
        total_pixels: width as u64 * height as u64,
    }
}

fn decode(path: &Path) -> AnalysisResult<Frame> {
    let decoded = image::open(path).map_err(|e| {
        AnalysisError::Decode(crate::frames::FrameError::open_failed(
            path,
            format!("Could not load image: {}", e),
        ))
    })?;
    Ok(decoded.to_rgb8())
}

fn save(frame: &Frame, path: &Path) -> AnalysisResult<()> {
    frame
        .save(path)
        .map_err(|e| AnalysisError::io_error("encode image", io::Error::other(e)))
}

fn extension_str(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaKind;
    use image::{Rgb, RgbImage};

    fn write_checkerboard(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let img = RgbImage::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn analyze_produces_full_report() {
        crate::logging::init_test_tracing();
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkerboard(&dir, "board.png");
        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();

        let mut engine = ImageAnalysisEngine::with_defaults();
        let report = engine.analyze(&asset);

        assert!(report.success);
        let value = report.to_value();
        assert_eq!(value["success"], true);

        let analysis = value["analysis"].as_object().unwrap();
        for key in [
            "basic_info",
            "color_analysis",
            "edge_detection",
            "face_detection",
            "object_detection",
            "image_quality",
        ] {
            assert!(analysis.contains_key(key), "missing stage key {}", key);
        }

        assert_eq!(analysis["basic_info"]["dimensions"], "64x64");
        assert_eq!(analysis["basic_info"]["total_pixels"], 4096);
        assert!(analysis["edge_detection"]["edge_pixel_count"].as_u64().unwrap() > 0);
        assert_eq!(analysis["face_detection"]["face_count"], 0);
    }

    #[test]
    fn analyze_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_checkerboard(&dir, "board.png");
        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();

        let mut engine = ImageAnalysisEngine::with_defaults();
        let first = engine.analyze(&asset).to_value();
        let second = engine.analyze(&asset).to_value();
        assert_eq!(first["analysis"]["color_analysis"], second["analysis"]["color_analysis"]);
        assert_eq!(first["analysis"]["edge_detection"], second["analysis"]["edge_detection"]);
        assert_eq!(first["analysis"]["image_quality"], second["analysis"]["image_quality"]);
    }

    #[test]
    fn oversized_image_is_rejected_without_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(21 * 1024 * 1024).unwrap();

        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();
        let mut engine = ImageAnalysisEngine::with_defaults();
        let report = engine.analyze(&asset);

        assert!(!report.success);
        let value = report.to_value();
        assert!(value["message"].as_str().unwrap().contains("exceeds maximum"));
        assert_eq!(value["analysis"], serde_json::json!({}));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"text").unwrap();

        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();
        let mut engine = ImageAnalysisEngine::with_defaults();
        let report = engine.analyze(&asset);

        assert!(!report.success);
        assert!(report.message.unwrap().contains("Unsupported image format"));
    }

    #[test]
    fn corrupt_image_fails_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();
        let mut engine = ImageAnalysisEngine::with_defaults();
        let report = engine.analyze(&asset);

        assert!(!report.success);
        assert!(report.message.unwrap().contains("Could not load image"));
    }

    #[test]
    fn resize_writes_requested_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_checkerboard(&dir, "board.png");
        let output = dir.path().join("small.png");

        let engine = ImageAnalysisEngine::with_defaults();
        let result = engine.resize(&input, &output, 32, 16).unwrap();

        assert_eq!(result.original_size, "64x64");
        assert_eq!(result.new_size, "32x16");
        let reopened = image::open(&output).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (32, 16));
    }

    #[test]
    fn convert_changes_container_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_checkerboard(&dir, "board.png");
        let output = dir.path().join("board.bmp");

        let engine = ImageAnalysisEngine::with_defaults();
        let result = engine.convert_format(&input, &output).unwrap();

        assert_eq!(result.input_format, ".png");
        assert_eq!(result.output_format, ".bmp");
        assert!(output.exists());
    }
}
