//! Frontal-face detection via a pretrained cascade model.
//!
//! The model file is discovered once per process and shared read-only
//! after that; each engine builds its detector from the shared
//! location at startup, never per frame. Deployments without the model
//! file get a reduced detector that reports zero regions.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use rustface::{Detector, ImageData};

use super::to_luma;
use crate::config::DetectionSettings;
use crate::frames::Frame;
use crate::models::{FaceReport, Region};

/// Per-octave pyramid downscale, the cascade analog of a 1.1 scale step.
const PYRAMID_SCALE: f32 = 0.91;

/// Sliding-window step in pixels, both axes.
const SLIDE_WINDOW_STEP: u32 = 4;

/// One-time discovery of the cascade model file.
static MODEL_LOCATION: OnceCell<Option<PathBuf>> = OnceCell::new();

fn discover_model(configured: &Path) -> Option<PathBuf> {
    if configured.is_file() {
        tracing::info!(
            "[FaceDetect] Using cascade model at {}",
            configured.display()
        );
        Some(configured.to_path_buf())
    } else {
        tracing::warn!(
            "[FaceDetect] Cascade model not found at {}, face detection disabled",
            configured.display()
        );
        None
    }
}

enum FaceBackend {
    /// Full cascade detection.
    Cascade(Box<dyn Detector>),
    /// Reduced implementation: no model available in this deployment.
    Disabled,
}

/// Face detector with startup feature detection.
pub struct FaceDetector {
    backend: FaceBackend,
}

impl FaceDetector {
    /// Build a detector from settings.
    ///
    /// The model location is resolved once per process; construction
    /// after that only loads the already-discovered file. Falls back
    /// to the reduced backend when the model is missing or unloadable.
    pub fn new(settings: &DetectionSettings) -> Self {
        let configured = PathBuf::from(&settings.face_model_path);
        let location = MODEL_LOCATION.get_or_init(|| discover_model(&configured));

        let backend = match location {
            Some(path) => match rustface::create_detector(&path.to_string_lossy()) {
                Ok(mut detector) => {
                    detector.set_min_face_size(settings.min_face_size);
                    detector.set_score_thresh(settings.score_threshold);
                    detector.set_pyramid_scale_factor(PYRAMID_SCALE);
                    detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);
                    FaceBackend::Cascade(detector)
                }
                Err(e) => {
                    tracing::warn!(
                        "[FaceDetect] Failed to load cascade model: {}, face detection disabled",
                        e
                    );
                    FaceBackend::Disabled
                }
            },
            None => FaceBackend::Disabled,
        };

        Self { backend }
    }

    /// Whether the full cascade backend is active.
    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, FaceBackend::Cascade(_))
    }

    /// Detect face-like regions in one frame.
    ///
    /// The reduced backend reports zero regions; detection never fails
    /// the stage.
    pub fn detect(&mut self, frame: &Frame) -> FaceReport {
        let FaceBackend::Cascade(detector) = &mut self.backend else {
            return FaceReport {
                face_count: 0,
                faces: Vec::new(),
            };
        };

        let gray = to_luma(frame);
        let (width, height) = gray.dimensions();
        let raw = gray.into_raw();
        let data = ImageData::new(&raw, width, height);

        let mut faces = Vec::new();
        for info in detector.detect(&data) {
            let bbox = info.bbox();
            let x = bbox.x().max(0) as u32;
            let y = bbox.y().max(0) as u32;
            let w = bbox.width();
            let h = bbox.height();
            faces.push(Region {
                x,
                y,
                width: w,
                height: h,
                area: w as u64 * h as u64,
            });
        }

        tracing::debug!("[FaceDetect] Found {} face region(s)", faces.len());

        FaceReport {
            face_count: faces.len(),
            faces,
        }
    }
}
