//! Still-image frame source.

use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::frames::{Frame, FrameError};

/// Frame source for a single decoded raster.
///
/// The image is decoded once at open; the cursor yields it exactly
/// once per pass and can be rewound with `seek(0)`.
pub struct StillImageSource {
    path: PathBuf,
    frame: Frame,
    cursor: u64,
}

impl StillImageSource {
    /// Decode an image file.
    pub fn open(path: &Path) -> Result<Self, FrameError> {
        let decoded = image::open(path)
            .map_err(|e| FrameError::open_failed(path, format!("Could not load image: {}", e)))?;

        let frame = decoded.to_rgb8();
        tracing::debug!(
            "[FrameSource] Decoded still image {}x{}",
            frame.width(),
            frame.height()
        );

        Ok(Self {
            path: path.to_path_buf(),
            frame,
            cursor: 0,
        })
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if self.cursor > 0 {
            return Ok(None);
        }
        self.cursor = 1;
        // Hand out a copy so the caller owns its frame exclusively.
        Ok(Some(self.frame.clone()))
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), FrameError> {
        if frame_index > 0 {
            return Err(FrameError::seek_failed(
                frame_index,
                "still image has a single frame",
            ));
        }
        self.cursor = 0;
        Ok(())
    }

    fn frame_count(&self) -> u64 {
        1
    }

    fn fps(&self) -> f64 {
        0.0
    }

    fn width(&self) -> u32 {
        self.frame.width()
    }

    fn height(&self) -> u32 {
        self.frame.height()
    }

    fn backend_name(&self) -> &str {
        "still"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let img = RgbImage::from_fn(32, 24, |_, _| Rgb([10, 20, 30]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn yields_single_frame_then_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "solid.png");

        let mut source = StillImageSource::open(&path).unwrap();
        assert_eq!(source.frame_count(), 1);
        assert_eq!((source.width(), source.height()), (32, 24));

        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn seek_zero_rewinds() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "solid.png");

        let mut source = StillImageSource::open(&path).unwrap();
        assert!(source.next_frame().unwrap().is_some());
        source.seek(0).unwrap();
        assert!(source.next_frame().unwrap().is_some());
    }

    #[test]
    fn seek_past_end_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "solid.png");

        let mut source = StillImageSource::open(&path).unwrap();
        assert!(source.seek(1).is_err());
    }

    #[test]
    fn open_rejects_non_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        assert!(matches!(
            StillImageSource::open(&path),
            Err(FrameError::OpenFailed { .. })
        ));
    }
}
