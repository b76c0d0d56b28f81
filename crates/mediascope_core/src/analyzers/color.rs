//! Color statistics for one frame.
//!
//! Computes per-channel means, luma brightness/contrast, dominant
//! colors via iterative centroid clustering, and a coarse
//! color-temperature label.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

use super::{luma_stats, round2, to_luma};
use crate::frames::Frame;
use crate::models::{ColorProfile, ColorTemperature};

/// Number of dominant-color clusters.
pub const DOMINANT_COLOR_COUNT: usize = 5;

/// Fixed seed so repeated analysis of the same frame is identical.
const CLUSTER_SEED: u64 = 42;

/// Lloyd iteration cap for the clustering loop.
const MAX_CLUSTER_ITERATIONS: usize = 10;

/// Centroid movement (squared) below which clustering has converged.
const CONVERGENCE_EPSILON: f64 = 1.0;

/// Pixels fed to clustering are capped with a deterministic stride.
const MAX_CLUSTER_PIXELS: usize = 50_000;

/// Profile the colors of one frame.
pub fn profile_colors(frame: &Frame) -> ColorProfile {
    let pixel_count = (frame.width() as u64 * frame.height() as u64).max(1) as f64;

    let mut sums = [0.0f64; 3];
    for pixel in frame.pixels() {
        sums[0] += pixel[0] as f64;
        sums[1] += pixel[1] as f64;
        sums[2] += pixel[2] as f64;
    }
    let means = [
        sums[0] / pixel_count,
        sums[1] / pixel_count,
        sums[2] / pixel_count,
    ];

    let gray = to_luma(frame);
    let (brightness, contrast) = luma_stats(&gray);

    ColorProfile {
        mean_color_rgb: [means[0] as u8, means[1] as u8, means[2] as u8],
        brightness: round2(brightness),
        contrast: round2(contrast),
        dominant_colors: dominant_colors(frame, DOMINANT_COLOR_COUNT),
        color_temperature: estimate_temperature(means[0], means[1], means[2]),
    }
}

/// Cluster pixel colors into `k` groups and return the centroids.
///
/// Deterministic: seeded initialization and a stride-based pixel cap.
/// Frames with fewer pixels than clusters yield an empty list rather
/// than an error.
pub fn dominant_colors(frame: &Frame, k: usize) -> Vec<[u8; 3]> {
    let pixels: Vec<[f64; 3]> = collect_cluster_pixels(frame);
    if pixels.len() < k || k == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(CLUSTER_SEED);
    let mut centroids: Vec<[f64; 3]> = sample(&mut rng, pixels.len(), k)
        .iter()
        .map(|i| pixels[i])
        .collect();

    let mut assignments = vec![0usize; pixels.len()];
    for _ in 0..MAX_CLUSTER_ITERATIONS {
        for (pixel, slot) in pixels.iter().zip(assignments.iter_mut()) {
            *slot = nearest_centroid(pixel, &centroids);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (pixel, &cluster) in pixels.iter().zip(assignments.iter()) {
            sums[cluster][0] += pixel[0];
            sums[cluster][1] += pixel[1];
            sums[cluster][2] += pixel[2];
            counts[cluster] += 1;
        }

        let mut movement = 0.0f64;
        for cluster in 0..k {
            // Empty clusters keep their previous centroid.
            if counts[cluster] == 0 {
                continue;
            }
            let n = counts[cluster] as f64;
            let updated = [
                sums[cluster][0] / n,
                sums[cluster][1] / n,
                sums[cluster][2] / n,
            ];
            movement += squared_distance(&centroids[cluster], &updated);
            centroids[cluster] = updated;
        }

        if movement < CONVERGENCE_EPSILON {
            break;
        }
    }

    centroids
        .iter()
        .map(|c| [c[0] as u8, c[1] as u8, c[2] as u8])
        .collect()
}

fn collect_cluster_pixels(frame: &Frame) -> Vec<[f64; 3]> {
    let total = frame.width() as usize * frame.height() as usize;
    let step = (total / MAX_CLUSTER_PIXELS).max(1);

    frame
        .pixels()
        .step_by(step)
        .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64])
        .collect()
}

fn nearest_centroid(pixel: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(pixel, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Coarse temperature heuristic over mean channel values.
fn estimate_temperature(r: f64, g: f64, b: f64) -> ColorTemperature {
    if b > r && b > g {
        ColorTemperature::Cool
    } else if r > b && r > g {
        ColorTemperature::Warm
    } else {
        ColorTemperature::Neutral
    }
}
