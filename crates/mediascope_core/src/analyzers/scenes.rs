//! Scene-cut detection via frame differencing.
//!
//! Sequential scan over consecutive frames, comparing mean absolute
//! luma difference against a fixed threshold. The scan stops at a hard
//! frame budget and the reported list keeps only the first ten cuts;
//! hitting either bound is normal completion, not an error, and the
//! true scanned count is always reported.

use image::GrayImage;

use super::{round2, to_luma};
use crate::error::StageResult;
use crate::frames::source::FrameSource;
use crate::models::{SceneBoundary, SceneReport};

/// Mean-difference threshold above which a cut is recorded.
pub const DIFF_THRESHOLD: f64 = 30.0;

/// Hard cap on scanned frames per asset.
pub const MAX_SCAN_FRAMES: u64 = 1000;

/// Reported boundary list is truncated to this many entries.
pub const MAX_BOUNDARIES: usize = 10;

/// Scan for scene cuts.
pub fn detect_scenes(source: &mut dyn FrameSource) -> StageResult<SceneReport> {
    source.seek(0)?;

    let Some(first) = source.next_frame()? else {
        return Ok(SceneReport {
            scene_changes_detected: 0,
            scene_changes: Vec::new(),
            frames_analyzed: 0,
        });
    };

    let fps = source.fps();
    let mut prev = to_luma(&first);

    let mut boundaries = Vec::new();
    let mut detected = 0usize;
    let mut frame_number = 0u64;

    while frame_number < MAX_SCAN_FRAMES {
        let Some(frame) = source.next_frame()? else {
            break;
        };
        let gray = to_luma(&frame);

        let difference = mean_abs_difference(&prev, &gray);
        if difference > DIFF_THRESHOLD {
            detected += 1;
            if boundaries.len() < MAX_BOUNDARIES {
                let timestamp = if fps > 0.0 {
                    frame_number as f64 / fps
                } else {
                    0.0
                };
                boundaries.push(SceneBoundary {
                    frame_index: frame_number,
                    timestamp_seconds: round2(timestamp),
                    difference_score: round2(difference),
                });
            }
        }

        prev = gray;
        frame_number += 1;
    }

    tracing::debug!(
        "[SceneDetect] {} cut(s) in {} scanned frame(s)",
        detected,
        frame_number
    );

    Ok(SceneReport {
        scene_changes_detected: detected,
        scene_changes: boundaries,
        frames_analyzed: frame_number,
    })
}

/// Mean absolute difference between two luma images.
fn mean_abs_difference(a: &GrayImage, b: &GrayImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let count = (a.width() as u64 * a.height() as u64).max(1) as f64;
    let sum: u64 = a
        .pixels()
        .zip(b.pixels())
        .map(|(pa, pb)| (pa[0] as i32 - pb[0] as i32).unsigned_abs() as u64)
        .sum();
    sum as f64 / count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::SyntheticSource;

    #[test]
    fn static_video_has_no_cuts() {
        let mut source = SyntheticSource::solid(32, 32, 30.0, 20, [60, 60, 60]);
        let report = detect_scenes(&mut source).unwrap();
        assert_eq!(report.scene_changes_detected, 0);
        assert!(report.scene_changes.is_empty());
        assert_eq!(report.frames_analyzed, 19);
    }

    #[test]
    fn hard_cut_is_found_near_the_cut_frame() {
        // 300 frames at 30fps: red half, then blue half.
        let mut source = SyntheticSource::new(32, 32, 30.0, 300, |frame_index, _, _| {
            if frame_index < 150 {
                [200, 0, 0]
            } else {
                [0, 0, 200]
            }
        });
        let report = detect_scenes(&mut source).unwrap();

        assert_eq!(report.scene_changes_detected, 1);
        let boundary = &report.scene_changes[0];
        assert_eq!(boundary.frame_index, 149);
        assert!((boundary.timestamp_seconds - 149.0 / 30.0).abs() < 0.01);
        assert!(boundary.difference_score > DIFF_THRESHOLD);
        assert_eq!(report.frames_analyzed, 299);
    }

    #[test]
    fn boundary_list_is_truncated_to_ten() {
        // Alternating black/white: a cut at every frame.
        let mut source = SyntheticSource::new(16, 16, 30.0, 40, |frame_index, _, _| {
            if frame_index % 2 == 0 {
                [0, 0, 0]
            } else {
                [255, 255, 255]
            }
        });
        let report = detect_scenes(&mut source).unwrap();

        assert_eq!(report.scene_changes.len(), MAX_BOUNDARIES);
        assert_eq!(report.scene_changes_detected, 39);

        let indices: Vec<u64> = report.scene_changes.iter().map(|b| b.frame_index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(indices, sorted, "frame indices must strictly increase");
    }

    #[test]
    fn scan_budget_is_enforced() {
        let mut source = SyntheticSource::solid(16, 16, 30.0, 50_000, [10, 10, 10]);
        let report = detect_scenes(&mut source).unwrap();
        assert_eq!(report.frames_analyzed, MAX_SCAN_FRAMES);
    }

    #[test]
    fn empty_video_reports_nothing_scanned() {
        let mut source = SyntheticSource::solid(16, 16, 30.0, 0, [0, 0, 0]);
        let report = detect_scenes(&mut source).unwrap();
        assert_eq!(report.frames_analyzed, 0);
        assert_eq!(report.scene_changes_detected, 0);
    }
}
