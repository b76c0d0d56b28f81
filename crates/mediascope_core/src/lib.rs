//! MediaScope Core - media analysis pipeline
//!
//! This crate contains all analysis logic with zero UI dependencies.
//! It takes a single image or video asset and produces a structured,
//! multi-facet report: color and brightness statistics, edge density,
//! face and object regions, a sharpness/noise quality score, and - for
//! video - frame sampling, motion estimation, scene-cut detection, and
//! audio-track probing.
//!
//! The caller validates paths and declares the media kind; a presenter
//! (CLI or UI) renders the returned report. Neither lives here.

pub mod analyzers;
pub mod config;
pub mod engine;
pub mod error;
pub mod frames;
pub mod logging;
pub mod models;

#[cfg(test)]
pub(crate) mod testutil;

pub use engine::{ImageAnalysisEngine, VideoAnalysisEngine};
pub use error::{AnalysisError, StageError};
pub use models::{AnalysisReport, MediaAsset, MediaKind};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
