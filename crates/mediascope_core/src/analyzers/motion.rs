//! Sparse optical-flow motion estimation.
//!
//! Places a regular grid of tracking points over the frame and tracks
//! each point between consecutive frames with an iterative
//! Lucas-Kanade solver: windowed spatial gradients form the 2x2 normal
//! equations, refined against the bilinear-sampled next frame. Windows
//! without usable gradient report zero displacement, the same answer
//! the tracker gives for a point that did not move. Analysis is capped
//! at a fixed number of frame pairs so per-asset cost stays constant.

use image::GrayImage;

use super::{mean_std, round2, to_luma};
use crate::error::StageResult;
use crate::frames::source::FrameSource;
use crate::models::{MotionCategory, MotionSummary};

/// Tracking-point spacing in pixels, both axes.
pub const GRID_SPACING: u32 = 20;

/// Hard cap on analyzed frame pairs per asset.
pub const MAX_FRAME_PAIRS: usize = 50;

/// Average displacement above which motion is High / Medium.
pub const MOTION_HIGH: f64 = 5.0;
pub const MOTION_MEDIUM: f64 = 2.0;

/// Half-width of the tracking window.
const WINDOW_RADIUS: i32 = 7;

/// Refinement iteration cap and convergence threshold per point.
const MAX_ITERATIONS: usize = 10;
const CONVERGENCE_EPSILON: f64 = 0.03;

/// Minimum determinant of the gradient matrix for a solvable window.
const MIN_DETERMINANT: f64 = 1e-4;

/// Estimate motion across consecutive frames.
pub fn estimate_motion(source: &mut dyn FrameSource) -> StageResult<MotionSummary> {
    source.seek(0)?;

    let Some(first) = source.next_frame()? else {
        return Ok(unknown_summary(0));
    };

    let mut prev = to_luma(&first);
    let points = grid_points(prev.width(), prev.height());

    let mut magnitudes = Vec::new();
    let mut pairs = 0usize;

    while pairs < MAX_FRAME_PAIRS {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        let gray = to_luma(&frame);

        if let Some(magnitude) = mean_flow_magnitude(&prev, &gray, &points) {
            magnitudes.push(magnitude);
        }

        prev = gray;
        pairs += 1;
    }

    if magnitudes.is_empty() {
        return Ok(unknown_summary(pairs));
    }

    let (average, std_dev) = mean_std(&magnitudes);
    let category = if average > MOTION_HIGH {
        MotionCategory::High
    } else if average > MOTION_MEDIUM {
        MotionCategory::Medium
    } else {
        MotionCategory::Low
    };

    tracing::debug!(
        "[MotionEstimate] {} pair(s), average displacement {:.2}",
        pairs,
        average
    );

    Ok(MotionSummary {
        frames_analyzed: pairs,
        average_motion: round2(average),
        motion_category: category,
        motion_std: round2(std_dev),
    })
}

fn unknown_summary(pairs: usize) -> MotionSummary {
    MotionSummary {
        frames_analyzed: pairs,
        average_motion: 0.0,
        motion_category: MotionCategory::Unknown,
        motion_std: 0.0,
    }
}

/// Regular grid of tracking points with margin for the window.
fn grid_points(width: u32, height: u32) -> Vec<(f64, f64)> {
    let margin = WINDOW_RADIUS as u32 + 1;
    let mut points = Vec::new();
    let mut y = margin;
    while y + margin < height {
        let mut x = margin;
        while x + margin < width {
            points.push((x as f64, y as f64));
            x += GRID_SPACING;
        }
        y += GRID_SPACING;
    }
    points
}

/// Mean Euclidean displacement over all grid points for one pair.
///
/// Returns `None` when the grid is empty (frame smaller than the
/// tracking window).
fn mean_flow_magnitude(prev: &GrayImage, next: &GrayImage, points: &[(f64, f64)]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }

    let mut total = 0.0f64;
    let mut tracked = 0usize;
    for &(x, y) in points {
        if let Some((dx, dy)) = track_point(prev, next, x, y) {
            total += (dx * dx + dy * dy).sqrt();
            tracked += 1;
        }
    }

    if tracked == 0 {
        return None;
    }
    Some(total / tracked as f64)
}

/// Track one point from `prev` to `next`.
///
/// Flat windows (no gradient energy) report zero displacement; points
/// whose refinement escapes the window are dropped.
fn track_point(prev: &GrayImage, next: &GrayImage, x: f64, y: f64) -> Option<(f64, f64)> {
    let mut gxx = 0.0f64;
    let mut gxy = 0.0f64;
    let mut gyy = 0.0f64;

    // Spatial gradient matrix over the window in the previous frame.
    for wy in -WINDOW_RADIUS..=WINDOW_RADIUS {
        for wx in -WINDOW_RADIUS..=WINDOW_RADIUS {
            let px = x + wx as f64;
            let py = y + wy as f64;
            let ix = (sample(prev, px + 1.0, py)? - sample(prev, px - 1.0, py)?) / 2.0;
            let iy = (sample(prev, px, py + 1.0)? - sample(prev, px, py - 1.0)?) / 2.0;
            gxx += ix * ix;
            gxy += ix * iy;
            gyy += iy * iy;
        }
    }

    let det = gxx * gyy - gxy * gxy;
    if det < MIN_DETERMINANT {
        return Some((0.0, 0.0));
    }

    let mut dx = 0.0f64;
    let mut dy = 0.0f64;

    for _ in 0..MAX_ITERATIONS {
        let mut bx = 0.0f64;
        let mut by = 0.0f64;

        for wy in -WINDOW_RADIUS..=WINDOW_RADIUS {
            for wx in -WINDOW_RADIUS..=WINDOW_RADIUS {
                let px = x + wx as f64;
                let py = y + wy as f64;
                let ix = (sample(prev, px + 1.0, py)? - sample(prev, px - 1.0, py)?) / 2.0;
                let iy = (sample(prev, px, py + 1.0)? - sample(prev, px, py - 1.0)?) / 2.0;
                let it = match sample(next, px + dx, py + dy) {
                    Some(v) => v - sample(prev, px, py)?,
                    None => return None, // refinement left the frame
                };
                bx += ix * it;
                by += iy * it;
            }
        }

        let step_x = -(gyy * bx - gxy * by) / det;
        let step_y = -(gxx * by - gxy * bx) / det;
        dx += step_x;
        dy += step_y;

        if step_x.abs() < CONVERGENCE_EPSILON && step_y.abs() < CONVERGENCE_EPSILON {
            break;
        }
    }

    let window = (2 * WINDOW_RADIUS + 1) as f64;
    if dx.abs() > window || dy.abs() > window {
        return None; // lost the point
    }

    Some((dx, dy))
}

/// Bilinear sample; `None` outside the frame.
fn sample(gray: &GrayImage, x: f64, y: f64) -> Option<f64> {
    if x < 0.0 || y < 0.0 {
        return None;
    }
    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = x0 + 1;
    let y1 = y0 + 1;
    if x1 >= gray.width() || y1 >= gray.height() {
        return None;
    }

    let fx = x - x0 as f64;
    let fy = y - y0 as f64;
    let p00 = gray.get_pixel(x0, y0)[0] as f64;
    let p10 = gray.get_pixel(x1, y0)[0] as f64;
    let p01 = gray.get_pixel(x0, y1)[0] as f64;
    let p11 = gray.get_pixel(x1, y1)[0] as f64;

    Some(
        p00 * (1.0 - fx) * (1.0 - fy)
            + p10 * fx * (1.0 - fy)
            + p01 * (1.0 - fx) * fy
            + p11 * fx * fy,
    )
}
