//! FFmpeg subprocess-based video frame stream.
//!
//! Spawns a single ffmpeg child that decodes the input and pipes raw
//! rgb24 frames over stdout. Sequential reads consume the pipe; a seek
//! restarts the child at the target timestamp. This keeps sequential
//! scans at one process per pass instead of one per frame.

use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use super::FrameSource;
use crate::frames::properties::detect_properties;
use crate::frames::{Frame, FrameError, VideoProperties};

/// FFmpeg raw-frame stream.
pub struct FfmpegFrameStream {
    path: PathBuf,
    props: VideoProperties,
    child: Option<Child>,
    reader: Option<BufReader<ChildStdout>>,
    /// Index of the next frame the cursor will yield.
    cursor: u64,
}

impl FfmpegFrameStream {
    /// Open a video file and start decoding from frame 0.
    pub fn open(path: &Path) -> Result<Self, FrameError> {
        if !path.exists() {
            return Err(FrameError::open_failed(path, "File does not exist"));
        }

        let props = detect_properties(path)?;
        if props.width == 0 || props.height == 0 {
            return Err(FrameError::open_failed(
                path,
                "Video stream has no dimensions",
            ));
        }

        let mut stream = Self {
            path: path.to_path_buf(),
            props,
            child: None,
            reader: None,
            cursor: 0,
        };
        stream.spawn_at(0)?;

        Ok(stream)
    }

    /// Check if ffmpeg is available.
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// Start (or restart) the decoder child at a frame index.
    fn spawn_at(&mut self, frame_index: u64) -> Result<(), FrameError> {
        self.stop_child();

        let mut command = Command::new("ffmpeg");
        command.arg("-v").arg("error");

        if frame_index > 0 && self.props.fps > 0.0 {
            let seconds = frame_index as f64 / self.props.fps;
            command.arg("-ss").arg(format!("{:.6}", seconds));
        }

        command
            .arg("-i")
            .arg(&self.path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "-an", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|e| {
            FrameError::open_failed(&self.path, format!("FFmpeg execution failed: {}", e))
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            FrameError::open_failed(&self.path, "FFmpeg produced no output pipe")
        })?;

        self.child = Some(child);
        self.reader = Some(BufReader::new(stdout));
        self.cursor = frame_index;

        tracing::trace!(
            "[FrameSource] ffmpeg decoder started at frame {}",
            frame_index
        );

        Ok(())
    }

    /// Kill and reap the decoder child, if any.
    fn stop_child(&mut self) {
        self.reader = None;
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl FrameSource for FfmpegFrameStream {
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };

        let frame_len = self.props.width as usize * self.props.height as usize * 3;
        let mut buffer = vec![0u8; frame_len];

        match reader.read_exact(&mut buffer) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.stop_child();
                return Ok(None);
            }
            Err(e) => {
                let index = self.cursor;
                self.stop_child();
                return Err(FrameError::decode_failed(index, e.to_string()));
            }
        }

        let frame = Frame::from_raw(self.props.width, self.props.height, buffer)
            .ok_or_else(|| FrameError::decode_failed(self.cursor, "Short frame buffer"))?;

        self.cursor += 1;
        Ok(Some(frame))
    }

    fn seek(&mut self, frame_index: u64) -> Result<(), FrameError> {
        if frame_index == self.cursor && self.reader.is_some() {
            return Ok(());
        }
        self.spawn_at(frame_index)
            .map_err(|e| FrameError::seek_failed(frame_index, e.to_string()))
    }

    fn frame_count(&self) -> u64 {
        self.props.frame_count
    }

    fn fps(&self) -> f64 {
        self.props.fps
    }

    fn width(&self) -> u32 {
        self.props.width
    }

    fn height(&self) -> u32 {
        self.props.height
    }

    fn backend_name(&self) -> &str {
        "ffmpeg"
    }
}

impl Drop for FfmpegFrameStream {
    fn drop(&mut self) {
        self.stop_child();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_available_does_not_panic() {
        let _available = FfmpegFrameStream::is_available();
    }

    #[test]
    fn open_nonexistent_fails() {
        let result = FfmpegFrameStream::open(Path::new("/nonexistent/video.mkv"));
        assert!(result.is_err());
    }
}
