//! Video analysis engine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::run_stage;
use crate::analyzers::audio::probe_audio;
use crate::analyzers::motion::estimate_motion;
use crate::analyzers::round2;
use crate::analyzers::sampler::sample_frames;
use crate::analyzers::scenes::detect_scenes;
use crate::config::Settings;
use crate::error::{AnalysisError, AnalysisResult};
use crate::frames::source::{open_source, FrameSource};
use crate::frames::FrameError;
use crate::models::{AnalysisReport, MediaAsset, VideoInfo, VideoSections};

/// Composes frame sampling, motion estimation, scene detection, and
/// audio probing for one video asset.
///
/// Stages run sequentially over a single decode cursor; the handle is
/// released before the report is assembled, on every path.
pub struct VideoAnalysisEngine {
    settings: Settings,
}

impl VideoAnalysisEngine {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Engine with default settings.
    pub fn with_defaults() -> Self {
        Self::new(Settings::default())
    }

    /// Analyze one video.
    ///
    /// Always returns a well-shaped report; `success` is false only
    /// when validation or the open step failed.
    pub fn analyze(&self, asset: &MediaAsset) -> AnalysisReport {
        tracing::info!("[VideoEngine] Analyzing {}", asset.path.display());

        if let Err(e) = self.settings.validation.validate_asset(asset) {
            tracing::warn!("[VideoEngine] Validation failed: {}", e);
            return AnalysisReport::failure(e.to_string());
        }

        let mut source = match open_source(asset, &self.settings.validation) {
            Ok(source) => source,
            Err(e) => {
                tracing::error!("[VideoEngine] Open failed: {}", e);
                return AnalysisReport::failure(format!("Could not open video file: {}", e));
            }
        };

        let sections = VideoSections {
            basic_info: run_stage("basic_info", || Ok(video_info(asset, source.as_ref()))),
            frame_analysis: run_stage("frame_analysis", || sample_frames(source.as_mut())),
            motion_analysis: run_stage("motion_analysis", || estimate_motion(source.as_mut())),
            scene_detection: run_stage("scene_detection", || detect_scenes(source.as_mut())),
            audio_analysis: run_stage("audio_analysis", || Ok(probe_audio(&asset.path))),
        };

        drop(source);

        AnalysisReport::video(asset.path.clone(), sections)
    }

    /// Export frames as JPEG files at a fixed seconds interval.
    pub fn extract_frames(
        &self,
        asset: &MediaAsset,
        output_dir: &Path,
        interval_seconds: u32,
    ) -> AnalysisResult<FrameExtraction> {
        fs::create_dir_all(output_dir)
            .map_err(|e| AnalysisError::io_error("create output directory", e))?;

        let mut source = open_source(asset, &self.settings.validation)?;
        let fps = source.fps();
        let frame_interval = ((fps * interval_seconds as f64) as u64).max(1);

        let mut frame_count = 0u64;
        let mut extracted_count = 0u64;

        while let Some(frame) = source.next_frame()? {
            if frame_count % frame_interval == 0 {
                let timestamp = if fps > 0.0 {
                    frame_count as f64 / fps
                } else {
                    0.0
                };
                let path = output_dir.join(format!("frame_{:.1}s.jpg", timestamp));
                frame
                    .save(&path)
                    .map_err(|e| AnalysisError::io_error("encode frame", io::Error::other(e)))?;
                extracted_count += 1;
            }
            frame_count += 1;
        }

        tracing::info!(
            "[VideoEngine] Extracted {} frame(s) from {} decoded",
            extracted_count,
            frame_count
        );

        Ok(FrameExtraction {
            total_frames: frame_count,
            extracted_frames: extracted_count,
            output_directory: output_dir.to_path_buf(),
            interval_seconds,
        })
    }

    /// Save the frame nearest a timestamp as a thumbnail image.
    pub fn create_thumbnail(
        &self,
        asset: &MediaAsset,
        output_path: &Path,
        timestamp_seconds: f64,
    ) -> AnalysisResult<()> {
        let mut source = open_source(asset, &self.settings.validation)?;

        let frame_number = (source.fps() * timestamp_seconds).max(0.0) as u64;
        source.seek(frame_number)?;

        let Some(frame) = source.next_frame()? else {
            return Err(AnalysisError::Decode(FrameError::decode_failed(
                frame_number,
                "Could not extract frame",
            )));
        };

        frame
            .save(output_path)
            .map_err(|e| AnalysisError::io_error("encode thumbnail", io::Error::other(e)))
    }
}

/// Result of a frame-export run.
#[derive(Debug, Clone, Serialize)]
pub struct FrameExtraction {
    pub total_frames: u64,
    pub extracted_frames: u64,
    pub output_directory: PathBuf,
    pub interval_seconds: u32,
}

fn video_info(asset: &MediaAsset, source: &dyn FrameSource) -> VideoInfo {
    let frame_count = source.frame_count();
    let fps = source.fps();
    let width = source.width();
    let height = source.height();

    let duration_seconds = if fps > 0.0 {
        frame_count as f64 / fps
    } else {
        0.0
    };

    let estimated_bitrate_kbps = if duration_seconds > 0.0 {
        round2((asset.byte_size as f64 * 8.0) / (duration_seconds * 1000.0))
    } else {
        0.0
    };

    VideoInfo {
        duration_seconds: round2(duration_seconds),
        duration_formatted: format_duration(duration_seconds),
        frame_count,
        fps: round2(fps),
        resolution: format!("{}x{}", width, height),
        width,
        height,
        aspect_ratio: if height > 0 {
            round2(width as f64 / height as f64)
        } else {
            0.0
        },
        file_size_bytes: asset.byte_size,
        file_size_mb: round2(asset.size_mb()),
        estimated_bitrate_kbps,
    }
}

/// Format a duration as HH:MM:SS.
fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
