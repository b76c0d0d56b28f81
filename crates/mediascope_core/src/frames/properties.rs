//! Video property detection via ffprobe.

use std::path::Path;
use std::process::Command;

use super::FrameError;

/// Container-level video properties.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    /// Frames per second.
    pub fps: f64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Total duration in seconds.
    pub duration_seconds: f64,
    /// Total frame count. Estimated from duration and fps when the
    /// container does not carry it.
    pub frame_count: u64,
}

/// Detect video properties from a file using ffprobe.
pub fn detect_properties(path: &Path) -> Result<VideoProperties, FrameError> {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    tracing::debug!("[VideoProps] Detecting properties for: {}", filename);

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=r_frame_rate,nb_frames,duration,width,height",
            "-show_entries",
            "format=duration",
            "-of",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| FrameError::PropertiesFailed(format!("ffprobe execution failed: {}", e)))?;

    if !output.status.success() {
        return Err(FrameError::PropertiesFailed(format!(
            "ffprobe exited with status {}",
            output.status.code().unwrap_or(-1)
        )));
    }

    let data: serde_json::Value = serde_json::from_slice(&output.stdout).map_err(|e| {
        FrameError::PropertiesFailed(format!("Failed to parse ffprobe JSON: {}", e))
    })?;

    let streams = data.get("streams").and_then(|s| s.as_array());
    let Some(stream) = streams.and_then(|s| s.first()) else {
        return Err(FrameError::PropertiesFailed(
            "No video stream found".to_string(),
        ));
    };

    let fps = stream
        .get("r_frame_rate")
        .and_then(|v| v.as_str())
        .and_then(parse_fps_fraction)
        .unwrap_or(0.0);

    let width = stream.get("width").and_then(|v| v.as_u64()).unwrap_or(0) as u32;
    let height = stream.get("height").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

    // Duration: stream first, format as fallback (MKV often only has
    // the format-level value).
    let mut duration_seconds = parse_numeric_str(stream.get("duration")).unwrap_or(0.0);
    if duration_seconds == 0.0 {
        duration_seconds =
            parse_numeric_str(data.get("format").and_then(|f| f.get("duration"))).unwrap_or(0.0);
    }

    let mut frame_count = stream
        .get("nb_frames")
        .and_then(|v| v.as_str())
        .filter(|s| *s != "N/A")
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    if frame_count == 0 && duration_seconds > 0.0 && fps > 0.0 {
        frame_count = (duration_seconds * fps) as u64;
    }

    tracing::debug!(
        "[VideoProps] {}x{} @ {:.3} fps, {} frames, {:.2}s",
        width,
        height,
        fps,
        frame_count,
        duration_seconds
    );

    Ok(VideoProperties {
        fps,
        width,
        height,
        duration_seconds,
        frame_count,
    })
}

/// Parse frame rate string like "24000/1001" into a float.
pub fn parse_fps_fraction(rate: &str) -> Option<f64> {
    if let Some((num, den)) = rate.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den != 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse().ok()
}

/// ffprobe reports durations as strings; "N/A" means absent.
fn parse_numeric_str(value: Option<&serde_json::Value>) -> Option<f64> {
    value
        .and_then(|v| v.as_str())
        .filter(|s| *s != "N/A")
        .and_then(|s| s.parse().ok())
}

/// Check if ffprobe is available.
pub fn is_ffprobe_available() -> bool {
    Command::new("ffprobe")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
