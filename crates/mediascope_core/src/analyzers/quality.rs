//! Sharpness and noise assessment.
//!
//! Sharpness is the variance of the Laplacian of the luma image; noise
//! is the luma standard deviation. The combined label is intentionally
//! asymmetric: a sharp-but-noisy frame rates Fair, while a
//! blurry-but-clean frame rates Poor.

use image::GrayImage;

use super::{luma_stats, round2, to_luma};
use crate::frames::Frame;
use crate::models::{QualityLabel, QualityScore, SharpnessLabel};

/// Laplacian-variance threshold above which a frame counts as sharp.
pub const SHARPNESS_SHARP: f64 = 100.0;

/// Laplacian-variance threshold above which a frame counts as moderate.
pub const SHARPNESS_MODERATE: f64 = 50.0;

/// Noise ceiling for the Good label.
pub const NOISE_GOOD: f64 = 50.0;

/// Assess the quality of one frame.
pub fn assess_quality(frame: &Frame) -> QualityScore {
    let gray = to_luma(frame);

    let laplacian_variance = laplacian_variance(&gray);
    let (_, noise_level) = luma_stats(&gray);

    let sharpness = if laplacian_variance > SHARPNESS_SHARP {
        SharpnessLabel::Sharp
    } else if laplacian_variance > SHARPNESS_MODERATE {
        SharpnessLabel::Moderate
    } else {
        SharpnessLabel::Blurry
    };

    let estimated_quality = if laplacian_variance > SHARPNESS_SHARP && noise_level < NOISE_GOOD {
        QualityLabel::Good
    } else if laplacian_variance > SHARPNESS_MODERATE {
        QualityLabel::Fair
    } else {
        QualityLabel::Poor
    };

    QualityScore {
        laplacian_variance: round2(laplacian_variance),
        sharpness,
        noise_level: round2(noise_level),
        estimated_quality,
    }
}

/// Variance of the 4-connected Laplacian over interior pixels.
///
/// Kernel:
/// ```text
/// [ 0  1  0 ]
/// [ 1 -4  1 ]
/// [ 0  1  0 ]
/// ```
fn laplacian_variance(gray: &GrayImage) -> f64 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut count = 0u64;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = gray.get_pixel(x, y)[0] as i32;
            let top = gray.get_pixel(x, y - 1)[0] as i32;
            let bottom = gray.get_pixel(x, y + 1)[0] as i32;
            let left = gray.get_pixel(x - 1, y)[0] as i32;
            let right = gray.get_pixel(x + 1, y)[0] as i32;

            let response = (top + bottom + left + right - 4 * center) as f64;
            count += 1;
            sum += response;
            sum_sq += response * response;
        }
    }

    let mean = sum / count as f64;
    (sum_sq / count as f64 - mean * mean).max(0.0)
}
