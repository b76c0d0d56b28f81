//! Frame-level and video-level analyzers.
//!
//! Each analyzer is a pure function over frames (or a frame source for
//! the video-level ones) producing one typed sub-report. Analyzers
//! never touch each other's state; the engines own sequencing and
//! failure isolation.

pub mod audio;
pub mod color;
pub mod contours;
pub mod edges;
pub mod faces;
pub mod motion;
pub mod quality;
pub mod sampler;
pub mod scenes;

use image::GrayImage;

use crate::frames::Frame;

/// Round to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 4 decimal places.
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Convert a frame to its luma representation.
pub(crate) fn to_luma(frame: &Frame) -> GrayImage {
    image::imageops::grayscale(frame)
}

/// Population mean and standard deviation of a sample list.
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

/// Mean and standard deviation of luma intensity.
pub(crate) fn luma_stats(gray: &GrayImage) -> (f64, f64) {
    let count = (gray.width() as u64 * gray.height() as u64) as f64;
    if count == 0.0 {
        return (0.0, 0.0);
    }

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for pixel in gray.pixels() {
        let v = pixel[0] as f64;
        sum += v;
        sum_sq += v * v;
    }

    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(3.14159), 3.14);
        assert_eq!(round4(0.123456), 0.1235);
    }

    #[test]
    fn mean_std_of_empty_is_zero() {
        assert_eq!(mean_std(&[]), (0.0, 0.0));
    }

    #[test]
    fn luma_stats_of_uniform_image() {
        let gray = GrayImage::from_pixel(16, 16, Luma([128]));
        let (mean, std) = luma_stats(&gray);
        assert_eq!(mean, 128.0);
        assert_eq!(std, 0.0);
    }

    #[test]
    fn luma_stats_of_half_and_half() {
        let gray = GrayImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        let (mean, std) = luma_stats(&gray);
        assert!((mean - 127.5).abs() < 0.001);
        assert!((std - 127.5).abs() < 0.001);
    }
}
