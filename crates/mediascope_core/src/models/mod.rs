//! Data models for MediaScope.
//!
//! This module contains all core data structures used throughout the
//! pipeline:
//! - Enums for media kind, color temperature, and analysis labels
//! - The caller-constructed media asset descriptor
//! - Per-stage report structures and the aggregate analysis report

mod enums;
mod media;
mod report;

// Re-export all public types
pub use enums::{ColorTemperature, MediaKind, MotionCategory, QualityLabel, SharpnessLabel};
pub use media::MediaAsset;
pub use report::{
    AnalysisReport, AudioProfile, BrightnessRange, ColorProfile, EdgeProfile, FaceReport,
    FrameStats, ImageInfo, ImageSections, MotionSummary, ObjectReport, QualityScore, Region,
    ReportSections, SceneBoundary, SceneReport, StageOutcome, VideoInfo, VideoSections,
};
