//! Frame access for images and videos.
//!
//! A [`FrameSource`](source::FrameSource) hands out owned RGB frames
//! through a sequential, seekable cursor. Backends: a still-image
//! decoder and an ffmpeg raw-frame stream. Handles are scoped
//! resources released on drop, on every exit path.

pub mod properties;
pub mod source;

use std::path::PathBuf;

use thiserror::Error;

pub use properties::VideoProperties;
pub use source::{open_source, FrameSource};

/// A decoded frame: an owned grid of RGB pixel samples.
///
/// Every frame handed out by a source is freshly owned by the caller;
/// sources never share buffers between consumers.
pub type Frame = image::RgbImage;

/// Errors that can occur during frame operations.
#[derive(Error, Debug)]
pub enum FrameError {
    /// Failed to open the media file.
    #[error("Failed to open media '{path}': {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Failed to decode a frame.
    #[error("Failed to decode frame {index}: {message}")]
    DecodeFailed { index: u64, message: String },

    /// Failed to reposition the decode cursor.
    #[error("Failed to seek to frame {index}: {message}")]
    SeekFailed { index: u64, message: String },

    /// FFmpeg not available.
    #[error("FFmpeg not found or not executable")]
    FfmpegNotFound,

    /// Media property detection failed.
    #[error("Failed to detect media properties: {0}")]
    PropertiesFailed(String),
}

impl FrameError {
    /// Create an open error.
    pub fn open_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::OpenFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error.
    pub fn decode_failed(index: u64, message: impl Into<String>) -> Self {
        Self::DecodeFailed {
            index,
            message: message.into(),
        }
    }

    /// Create a seek error.
    pub fn seek_failed(index: u64, message: impl Into<String>) -> Self {
        Self::SeekFailed {
            index,
            message: message.into(),
        }
    }
}
