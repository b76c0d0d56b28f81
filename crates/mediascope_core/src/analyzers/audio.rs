//! Audio-track probing.
//!
//! Opens the container with ffprobe, independent of the frame-decode
//! handle: a separate resource with its own lifecycle. When the probe
//! itself cannot open the file the result is `has_audio: false` with
//! an explanatory note, never a fatal error.

use std::path::Path;
use std::process::Command;

use super::round2;
use crate::error::{StageError, StageResult};
use crate::models::AudioProfile;

/// Probe the audio track of a container.
pub fn probe_audio(path: &Path) -> AudioProfile {
    match run_probe(path) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("[AudioProbe] Probe failed: {}", e);
            AudioProfile {
                has_audio: false,
                duration: 0.0,
                sample_rate: None,
                channels: None,
                note: Some(e.to_string()),
            }
        }
    }
}

fn run_probe(path: &Path) -> StageResult<AudioProfile> {
    let output = Command::new("ffprobe")
        .args(["-v", "error", "-show_streams", "-show_format", "-of", "json"])
        .arg(path)
        .output()
        .map_err(|e| StageError::other(format!("ffprobe execution failed: {}", e)))?;

    if !output.status.success() {
        return Err(StageError::command_failed(
            "ffprobe",
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let data: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| StageError::parse("ffprobe JSON", e.to_string()))?;

    let duration = data
        .get("format")
        .and_then(|f| f.get("duration"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let audio_stream = data
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.get("codec_type").and_then(|t| t.as_str()) == Some("audio"))
        });

    let sample_rate = audio_stream
        .and_then(|s| s.get("sample_rate"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<u32>().ok());

    let channels = audio_stream
        .and_then(|s| s.get("channels"))
        .and_then(|v| v.as_u64())
        .map(|c| c as u8);

    Ok(AudioProfile {
        has_audio: audio_stream.is_some(),
        duration: round2(duration),
        sample_rate,
        channels,
        note: None,
    })
}
