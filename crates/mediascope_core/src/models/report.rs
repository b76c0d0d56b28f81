//! Per-stage report structures and the aggregate analysis report.
//!
//! Stages produce typed sub-reports wrapped in [`StageOutcome`]. The
//! aggregate report serializes to a fixed dictionary shape that is the
//! compatibility surface for every caller: stage keys are always
//! present, and a failed stage contributes an empty object rather than
//! a missing key.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::enums::{ColorTemperature, MotionCategory, QualityLabel, SharpnessLabel};

/// Color statistics for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorProfile {
    /// Per-channel mean as integer RGB.
    pub mean_color_rgb: [u8; 3],
    /// Mean luma intensity.
    pub brightness: f64,
    /// Luma standard deviation.
    pub contrast: f64,
    /// Cluster centroid colors, up to five.
    pub dominant_colors: Vec<[u8; 3]>,
    pub color_temperature: ColorTemperature,
}

/// Edge-density statistics for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeProfile {
    pub edge_pixel_count: u64,
    pub total_pixels: u64,
    /// Fraction of edge pixels, in [0, 1].
    pub edge_density: f64,
    pub edge_density_percentage: f64,
}

/// A detected rectangular region in frame-pixel coordinates.
///
/// Used for both face regions and contour objects. Detections are
/// independent per frame; no identity persists across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub area: u64,
}

/// Face-detection result for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceReport {
    pub face_count: usize,
    pub faces: Vec<Region>,
}

/// Contour-based object detection result for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectReport {
    pub object_count: usize,
    pub objects: Vec<Region>,
    /// Outer contour count before the minimum-area filter.
    pub total_contours: usize,
}

/// Sharpness and noise assessment for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScore {
    pub laplacian_variance: f64,
    pub sharpness: SharpnessLabel,
    pub noise_level: f64,
    pub estimated_quality: QualityLabel,
}

/// Basic information about a still image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub dimensions: String,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub color_space: String,
    pub file_size_bytes: u64,
    pub file_size_mb: f64,
    pub aspect_ratio: f64,
    pub total_pixels: u64,
}

/// Basic information about a video container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub duration_formatted: String,
    pub frame_count: u64,
    pub fps: f64,
    pub resolution: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    pub file_size_bytes: u64,
    pub file_size_mb: f64,
    pub estimated_bitrate_kbps: f64,
}

/// Brightness extremes across sampled frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrightnessRange {
    pub min: f64,
    pub max: f64,
}

/// Aggregate statistics over the sampled frame set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameStats {
    pub sampled_frames: usize,
    pub average_brightness: f64,
    pub brightness_std: f64,
    pub average_contrast: f64,
    pub contrast_std: f64,
    pub brightness_range: BrightnessRange,
}

impl FrameStats {
    /// All-zero aggregate for assets that yielded no decodable frames.
    pub fn empty() -> Self {
        Self {
            sampled_frames: 0,
            average_brightness: 0.0,
            brightness_std: 0.0,
            average_contrast: 0.0,
            contrast_std: 0.0,
            brightness_range: BrightnessRange { min: 0.0, max: 0.0 },
        }
    }
}

/// Sparse optical-flow summary across analyzed frame pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionSummary {
    /// Frame pairs consumed, including untrackable ones.
    pub frames_analyzed: usize,
    pub average_motion: f64,
    pub motion_category: MotionCategory,
    pub motion_std: f64,
}

/// A detected scene cut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneBoundary {
    #[serde(rename = "frame")]
    pub frame_index: u64,
    #[serde(rename = "timestamp")]
    pub timestamp_seconds: f64,
    pub difference_score: f64,
}

/// Scene-cut detection result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneReport {
    /// Total cuts detected within the scanned window.
    pub scene_changes_detected: usize,
    /// First ten cuts, ordered by strictly increasing frame index.
    pub scene_changes: Vec<SceneBoundary>,
    /// True scanned frame count (bounded by the scan budget).
    pub frames_analyzed: u64,
}

/// Audio-track information from the container probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioProfile {
    pub has_audio: bool,
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    /// Explanation when the probe itself could not open the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of one analysis stage.
///
/// A failed stage keeps its reason for logging but serializes to an
/// empty object, so the report shape never changes.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Succeeded(T),
    Failed(String),
}

impl<T> StageOutcome<T> {
    /// Get the sub-report if the stage succeeded.
    pub fn as_succeeded(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            Self::Failed(_) => None,
        }
    }

    /// Get the failure reason if the stage failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Succeeded(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

impl<T: Serialize> StageOutcome<T> {
    /// Serialize to the boundary shape: sub-report or empty object.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Succeeded(value) => serde_json::to_value(value).unwrap_or_else(|_| json!({})),
            Self::Failed(_) => json!({}),
        }
    }
}

/// Stage outcomes for a still-image analysis.
#[derive(Debug, Clone)]
pub struct ImageSections {
    pub basic_info: StageOutcome<ImageInfo>,
    pub color_analysis: StageOutcome<ColorProfile>,
    pub edge_detection: StageOutcome<EdgeProfile>,
    pub face_detection: StageOutcome<FaceReport>,
    pub object_detection: StageOutcome<ObjectReport>,
    pub image_quality: StageOutcome<QualityScore>,
}

impl ImageSections {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("basic_info".into(), self.basic_info.to_value());
        map.insert("color_analysis".into(), self.color_analysis.to_value());
        map.insert("edge_detection".into(), self.edge_detection.to_value());
        map.insert("face_detection".into(), self.face_detection.to_value());
        map.insert("object_detection".into(), self.object_detection.to_value());
        map.insert("image_quality".into(), self.image_quality.to_value());
        Value::Object(map)
    }
}

/// Stage outcomes for a video analysis.
#[derive(Debug, Clone)]
pub struct VideoSections {
    pub basic_info: StageOutcome<VideoInfo>,
    pub frame_analysis: StageOutcome<FrameStats>,
    pub motion_analysis: StageOutcome<MotionSummary>,
    pub scene_detection: StageOutcome<SceneReport>,
    pub audio_analysis: StageOutcome<AudioProfile>,
}

impl VideoSections {
    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("basic_info".into(), self.basic_info.to_value());
        map.insert("frame_analysis".into(), self.frame_analysis.to_value());
        map.insert("motion_analysis".into(), self.motion_analysis.to_value());
        map.insert("scene_detection".into(), self.scene_detection.to_value());
        map.insert("audio_analysis".into(), self.audio_analysis.to_value());
        Value::Object(map)
    }
}

/// Stage outcomes per asset kind.
#[derive(Debug, Clone)]
pub enum ReportSections {
    Image(ImageSections),
    Video(VideoSections),
    /// Validation or open failed before any stage ran.
    Empty,
}

/// Aggregate analysis report returned to the caller.
///
/// Created fresh per call and owned solely by the caller; the pipeline
/// keeps nothing. `success` is false only when validation or the open
/// step failed - individual stage failures degrade the report without
/// flipping it.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub success: bool,
    pub file_path: Option<PathBuf>,
    pub message: Option<String>,
    pub sections: ReportSections,
}

impl AnalysisReport {
    /// Report for a validation or open failure.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            file_path: None,
            message: Some(message.into()),
            sections: ReportSections::Empty,
        }
    }

    /// Successful still-image report.
    pub fn image(path: PathBuf, sections: ImageSections) -> Self {
        Self {
            success: true,
            file_path: Some(path),
            message: None,
            sections: ReportSections::Image(sections),
        }
    }

    /// Successful video report.
    pub fn video(path: PathBuf, sections: VideoSections) -> Self {
        Self {
            success: true,
            file_path: Some(path),
            message: None,
            sections: ReportSections::Video(sections),
        }
    }

    /// Serialize to the documented compatibility shape.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("success".into(), Value::Bool(self.success));

        if let Some(path) = &self.file_path {
            map.insert("file_path".into(), json!(path.to_string_lossy()));
        }
        if let Some(message) = &self.message {
            map.insert("message".into(), json!(message));
        }

        let analysis = match &self.sections {
            ReportSections::Image(sections) => sections.to_value(),
            ReportSections::Video(sections) => sections.to_value(),
            ReportSections::Empty => json!({}),
        };
        map.insert("analysis".into(), analysis);

        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_edge_profile() -> EdgeProfile {
        EdgeProfile {
            edge_pixel_count: 120,
            total_pixels: 4096,
            edge_density: 0.0293,
            edge_density_percentage: 2.93,
        }
    }

    #[test]
    fn failed_stage_serializes_empty_object() {
        let outcome: StageOutcome<EdgeProfile> = StageOutcome::Failed("boom".to_string());
        assert_eq!(outcome.to_value(), json!({}));
        assert_eq!(outcome.failure_reason(), Some("boom"));
    }

    #[test]
    fn succeeded_stage_serializes_fields() {
        let outcome = StageOutcome::Succeeded(sample_edge_profile());
        let value = outcome.to_value();
        assert_eq!(value["edge_pixel_count"], 120);
        assert_eq!(value["edge_density"], 0.0293);
    }

    #[test]
    fn failure_report_has_expected_shape() {
        let report = AnalysisReport::failure("File size (25.0MB) exceeds maximum allowed size (20MB)");
        let value = report.to_value();

        assert_eq!(value["success"], false);
        assert!(value["message"].as_str().unwrap().contains("exceeds maximum"));
        assert_eq!(value["analysis"], json!({}));
        assert!(value.get("file_path").is_none());
    }

    #[test]
    fn image_report_keeps_all_stage_keys() {
        let sections = ImageSections {
            basic_info: StageOutcome::Failed("no metadata".to_string()),
            color_analysis: StageOutcome::Failed("x".to_string()),
            edge_detection: StageOutcome::Succeeded(sample_edge_profile()),
            face_detection: StageOutcome::Succeeded(FaceReport {
                face_count: 0,
                faces: Vec::new(),
            }),
            object_detection: StageOutcome::Failed("x".to_string()),
            image_quality: StageOutcome::Failed("x".to_string()),
        };
        let report = AnalysisReport::image(PathBuf::from("/tmp/a.png"), sections);
        let value = report.to_value();

        assert_eq!(value["success"], true);
        let analysis = value["analysis"].as_object().unwrap();
        let keys: Vec<&String> = analysis.keys().collect();
        assert_eq!(
            keys,
            vec![
                "basic_info",
                "color_analysis",
                "edge_detection",
                "face_detection",
                "image_quality",
                "object_detection",
            ]
        );
        // Failed stages are empty objects, not missing keys.
        assert_eq!(analysis["basic_info"], json!({}));
        assert_eq!(analysis["edge_detection"]["total_pixels"], 4096);
    }

    #[test]
    fn scene_boundary_uses_compat_field_names() {
        let boundary = SceneBoundary {
            frame_index: 149,
            timestamp_seconds: 4.97,
            difference_score: 112.4,
        };
        let value = serde_json::to_value(&boundary).unwrap();
        assert_eq!(value["frame"], 149);
        assert_eq!(value["timestamp"], 4.97);
        assert!(value.get("frame_index").is_none());
    }

    #[test]
    fn audio_profile_omits_absent_fields() {
        let profile = AudioProfile {
            has_audio: false,
            duration: 0.0,
            sample_rate: None,
            channels: None,
            note: Some("probe failed".to_string()),
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("sample_rate").is_none());
        assert_eq!(value["note"], "probe failed");
    }
}
