//! Edge-density profiling via Canny edge detection.

use imageproc::edges::canny;

use super::{round2, round4, to_luma};
use crate::frames::Frame;
use crate::models::EdgeProfile;

/// Canny hysteresis thresholds.
pub const CANNY_LOW: f32 = 50.0;
pub const CANNY_HIGH: f32 = 150.0;

/// Compute the edge density of one frame.
pub fn profile_edges(frame: &Frame) -> EdgeProfile {
    let gray = to_luma(frame);
    let edge_map = canny(&gray, CANNY_LOW, CANNY_HIGH);

    let edge_pixel_count = edge_map.pixels().filter(|p| p[0] > 0).count() as u64;
    let total_pixels = edge_map.width() as u64 * edge_map.height() as u64;
    let density = if total_pixels > 0 {
        edge_pixel_count as f64 / total_pixels as f64
    } else {
        0.0
    };

    EdgeProfile {
        edge_pixel_count,
        total_pixels,
        edge_density: round4(density),
        edge_density_percentage: round2(density * 100.0),
    }
}
