//! Error types for the analysis pipeline.
//!
//! Two tiers: `AnalysisError` is fatal for the asset being analyzed
//! (validation or open failures); `StageError` belongs to a single
//! analysis stage and is caught at the stage boundary, degrading the
//! report instead of aborting it.

use std::io;

use thiserror::Error;

use crate::frames::FrameError;

/// Fatal errors that abort analysis of one asset.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The asset failed validation (bad path, format, or size).
    #[error("{0}")]
    InvalidInput(String),

    /// The decode handle could not be opened.
    #[error(transparent)]
    Decode(#[from] FrameError),

    /// File I/O outside the decode path.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl AnalysisError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result type for whole-asset operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error from a single analysis stage.
///
/// Stage errors never cross the orchestrator boundary; the engine
/// records the failure and substitutes an empty sub-result.
#[derive(Error, Debug)]
pub enum StageError {
    /// Frame access failed mid-stage.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// An external probe command failed.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// Parsing error (e.g., probe JSON).
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Generic stage error with message.
    #[error("{0}")]
    Other(String),
}

impl StageError {
    /// Create a command failed error.
    pub fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            what: what.into(),
            message: message.into(),
        }
    }

    /// Create a generic error.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Result type for stage operations.
pub type StageResult<T> = Result<T, StageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_displays_context() {
        let err = StageError::command_failed("ffprobe", 1, "No such file");
        let msg = err.to_string();
        assert!(msg.contains("ffprobe"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("No such file"));
    }

    #[test]
    fn invalid_input_displays_message_only() {
        let err = AnalysisError::invalid_input("Unsupported image format '.xyz'");
        assert_eq!(err.to_string(), "Unsupported image format '.xyz'");
    }
}
