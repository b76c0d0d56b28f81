//! Contour-based foreground object detection.
//!
//! Binarizes luma at a fixed threshold, extracts outer contours, and
//! keeps the bounding boxes of blobs above a minimum area. The raw
//! outer-contour count is reported for diagnostics.

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};

use super::to_luma;
use crate::frames::Frame;
use crate::models::{ObjectReport, Region};

/// Luma binarization threshold.
pub const BINARY_THRESHOLD: u8 = 127;

/// Minimum blob area in pixels squared; smaller blobs are noise.
pub const MIN_OBJECT_AREA: f64 = 1000.0;

/// Detect foreground objects in one frame.
pub fn detect_objects(frame: &Frame) -> ObjectReport {
    let gray = to_luma(frame);
    let binary = binarize(&gray);

    let contours: Vec<Contour<u32>> = find_contours(&binary);

    // Outermost borders only, matching an external-contour retrieval.
    let outer: Vec<&Contour<u32>> = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .collect();

    let mut objects = Vec::new();
    for contour in &outer {
        let area = polygon_area(&contour.points);
        if area > MIN_OBJECT_AREA {
            if let Some(region) = bounding_region(&contour.points) {
                objects.push(Region {
                    area: area as u64,
                    ..region
                });
            }
        }
    }

    ObjectReport {
        object_count: objects.len(),
        objects,
        total_contours: outer.len(),
    }
}

fn binarize(gray: &GrayImage) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > BINARY_THRESHOLD {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Shoelace area of a closed contour polygon.
fn polygon_area(points: &[imageproc::point::Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0i64;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
    }
    (twice_area.abs() as f64) / 2.0
}

fn bounding_region(points: &[imageproc::point::Point<u32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(Region {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
        area: 0,
    })
}
