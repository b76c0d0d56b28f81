//! Frame source backends.
//!
//! Provides decode handles for images and videos behind a common trait:
//! - Still backend: decodes one raster with the `image` crate
//! - FFmpeg stream backend: one child process piping raw rgb24 frames
//!
//! # Usage
//!
//! ```ignore
//! use mediascope_core::frames::source::open_source;
//!
//! let mut source = open_source(&asset, &settings.validation)?;
//! while let Some(frame) = source.next_frame()? {
//!     // frame is an owned RgbImage
//! }
//! // handle released on drop
//! ```

mod ffmpeg;
mod still;

pub use ffmpeg::FfmpegFrameStream;
pub use still::StillImageSource;

use crate::config::ValidationSettings;
use crate::models::{MediaAsset, MediaKind};

use super::{Frame, FrameError};

/// Trait for frame sources.
///
/// A source owns a decode cursor: `next_frame` advances it, `seek`
/// repositions it. The handle is a scoped resource; dropping it
/// releases the underlying decoder on every exit path.
pub trait FrameSource {
    /// Decode the frame at the cursor and advance.
    ///
    /// Returns `Ok(None)` at end of stream. Every returned frame is a
    /// freshly owned buffer.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError>;

    /// Reposition the cursor to a frame index.
    fn seek(&mut self, frame_index: u64) -> Result<(), FrameError>;

    /// Total frame count (1 for still images; may be estimated).
    fn frame_count(&self) -> u64;

    /// Frames per second (0.0 for still images).
    fn fps(&self) -> f64;

    /// Frame width in pixels.
    fn width(&self) -> u32;

    /// Frame height in pixels.
    fn height(&self) -> u32;

    /// Get the backend name.
    fn backend_name(&self) -> &str;
}

/// Open a decode handle for an asset.
///
/// Cheap rejections run first: the extension allow-list and size
/// ceiling are checked before any decode work, and the existence check
/// doubles as the defense-in-depth guard the open step owes its
/// callers. The backend follows the declared kind.
pub fn open_source(
    asset: &MediaAsset,
    validation: &ValidationSettings,
) -> Result<Box<dyn FrameSource>, FrameError> {
    if let Err(e) = validation.validate_asset(asset) {
        return Err(FrameError::open_failed(&asset.path, e.to_string()));
    }

    match asset.kind {
        MediaKind::Image => {
            let source = StillImageSource::open(&asset.path)?;
            Ok(Box::new(source))
        }
        MediaKind::Video => {
            if !FfmpegFrameStream::is_available() {
                tracing::error!("[FrameSource] FFmpeg not found, cannot decode video");
                return Err(FrameError::FfmpegNotFound);
            }
            let source = FfmpegFrameStream::open(&asset.path)?;
            tracing::info!(
                "[FrameSource] Opened video: {}x{} @ {:.3} fps, {} frames",
                source.width(),
                source.height(),
                source.fps(),
                source.frame_count()
            );
            Ok(Box::new(source))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn open_rejects_unsupported_extension_before_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not media").unwrap();

        let asset = MediaAsset::probe(&path, MediaKind::Image).unwrap();
        let result = open_source(&asset, &ValidationSettings::default());
        assert!(matches!(result, Err(FrameError::OpenFailed { .. })));
    }

    #[test]
    fn open_rejects_missing_file() {
        let asset = MediaAsset {
            path: PathBuf::from("/nonexistent/clip.mp4"),
            kind: MediaKind::Video,
            byte_size: 0,
            declared_format: ".mp4".to_string(),
        };
        let result = open_source(&asset, &ValidationSettings::default());
        assert!(result.is_err());
    }
}
