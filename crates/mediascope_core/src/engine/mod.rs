//! Analysis engines.
//!
//! Both engines walk the same linear machine:
//! `Validate -> Open -> {stages} -> Release -> Assemble`. Stages run
//! in a fixed order because the later video stages share the decode
//! cursor. Each stage is attempted independently: a failure is logged,
//! recorded in the outcome, and replaced by an empty sub-result. Only
//! Validate and Open failures make the whole report unsuccessful.
//! There is no retry and no internal cancellation; callers bound
//! wall-clock time externally.

mod image;
mod video;

pub use self::image::{ConvertResult, ImageAnalysisEngine, ResizeResult};
pub use self::video::{FrameExtraction, VideoAnalysisEngine};

use crate::error::StageResult;
use crate::models::StageOutcome;

/// Run one stage, isolating its failure at this boundary.
pub(crate) fn run_stage<T>(
    stage: &str,
    f: impl FnOnce() -> StageResult<T>,
) -> StageOutcome<T> {
    tracing::debug!("[Engine] Running stage '{}'", stage);
    match f() {
        Ok(value) => StageOutcome::Succeeded(value),
        Err(e) => {
            tracing::warn!("[Engine] Stage '{}' failed: {}", stage, e);
            StageOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StageError;

    #[test]
    fn run_stage_wraps_success() {
        let outcome = run_stage("demo", || Ok(7));
        assert_eq!(outcome.as_succeeded(), Some(&7));
    }

    #[test]
    fn run_stage_isolates_failure() {
        let outcome: StageOutcome<i32> =
            run_stage("demo", || Err(StageError::other("went sideways")));
        assert_eq!(outcome.failure_reason(), Some("went sideways"));
    }
}
