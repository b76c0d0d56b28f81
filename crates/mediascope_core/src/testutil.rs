//! Test fixtures: an in-memory frame source that fabricates frames
//! from a per-pixel painter function, so video analyzers can be
//! exercised against assets of any length without decoding anything.

use image::{Rgb, RgbImage};

use crate::frames::source::FrameSource;
use crate::frames::{Frame, FrameError};

type Painter = Box<dyn Fn(u64, u32, u32) -> [u8; 3]>;

/// Synthetic frame source driven by a painter `fn(frame, x, y) -> rgb`.
pub(crate) struct SyntheticSource {
    width: u32,
    height: u32,
    fps: f64,
    frame_count: u64,
    cursor: u64,
    painter: Painter,
}

impl SyntheticSource {
    pub(crate) fn new(
        width: u32,
        height: u32,
        fps: f64,
        frame_count: u64,
        painter: impl Fn(u64, u32, u32) -> [u8; 3] + 'static,
    ) -> Self {
        Self {
            width,
            height,
            fps,
            frame_count,
            cursor: 0,
            painter: Box::new(painter),
        }
    }

    /// Every frame the same solid color.
    pub(crate) fn solid(
        width: u32,
        height: u32,
        fps: f64,
        frame_count: u64,
        color: [u8; 3],
    ) -> Self {
        Self::new(width, height, fps, frame_count, move |_, _, _| color)
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if self.cursor >= self.frame_count {
            return Ok(None);
        }
        let index = self.cursor;
        let painter = &self.painter;
        let frame = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(painter(index, x, y))
        });
        self.cursor += 1;
        Ok(Some(frame))
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), FrameError> {
        self.cursor = frame_index;
        Ok(())
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn backend_name(&self) -> &str {
        "synthetic"
    }
}

/// Smooth 2-D texture with gradient energy everywhere; suitable for
/// point tracking.
pub(crate) fn textured_pixel(x: u32, y: u32) -> [u8; 3] {
    let v = 128.0 + 60.0 * (x as f64 * 0.25).sin() * (y as f64 * 0.3).cos();
    let v = v.clamp(0.0, 255.0) as u8;
    [v, v, v]
}
