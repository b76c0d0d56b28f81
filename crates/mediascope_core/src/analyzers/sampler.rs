//! Stride-based frame sampling with brightness/contrast aggregation.
//!
//! Samples at most ten frames at a fixed stride regardless of asset
//! length, so sampling cost is constant in the size of the input.

use super::{luma_stats, mean_std, round2, to_luma};
use crate::error::StageResult;
use crate::frames::source::FrameSource;
use crate::models::{BrightnessRange, FrameStats};

/// Hard cap on sampled frames per asset.
pub const MAX_SAMPLED_FRAMES: u64 = 10;

/// Sample frames across the asset and aggregate luma statistics.
///
/// An asset that yields no decodable frames produces the all-zero
/// aggregate rather than an error.
pub fn sample_frames(source: &mut dyn FrameSource) -> StageResult<FrameStats> {
    let total = source.frame_count();
    if total == 0 {
        return Ok(FrameStats::empty());
    }

    let stride = (total / MAX_SAMPLED_FRAMES).max(1);

    let mut brightness_values = Vec::new();
    let mut contrast_values = Vec::new();

    let mut index = 0u64;
    while index < total && (brightness_values.len() as u64) < MAX_SAMPLED_FRAMES {
        source.seek(index)?;
        let Some(frame) = source.next_frame()? else {
            break;
        };

        let gray = to_luma(&frame);
        let (brightness, contrast) = luma_stats(&gray);
        brightness_values.push(brightness);
        contrast_values.push(contrast);

        index += stride;
    }

    if brightness_values.is_empty() {
        return Ok(FrameStats::empty());
    }

    let (avg_brightness, brightness_std) = mean_std(&brightness_values);
    let (avg_contrast, contrast_std) = mean_std(&contrast_values);
    let min = brightness_values.iter().cloned().fold(f64::MAX, f64::min);
    let max = brightness_values.iter().cloned().fold(f64::MIN, f64::max);

    tracing::debug!(
        "[FrameSampler] Sampled {} frame(s) at stride {}",
        brightness_values.len(),
        stride
    );

    Ok(FrameStats {
        sampled_frames: brightness_values.len(),
        average_brightness: round2(avg_brightness),
        brightness_std: round2(brightness_std),
        average_contrast: round2(avg_contrast),
        contrast_std: round2(contrast_std),
        brightness_range: BrightnessRange {
            min: round2(min),
            max: round2(max),
        },
    })
}
