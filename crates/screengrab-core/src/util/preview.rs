//! File-based frame preview
//!
//! Writes benchmark frames to a PNG file instead of a window, which works on
//! headless machines and over SSH. The file is overwritten in place, so an
//! image viewer that reloads on change shows a live preview.

use std::path::{Path, PathBuf};

use image::codecs::png::CompressionType;
use tracing::debug;

use super::encode::write_png_with_compression;
use crate::{capture::ImageBuffer, error::CaptureResult, perf::FramePreview};

/// Writes every `every`-th frame to `path`, starting with the first
///
/// Frames it does not want are never scaled by the benchmark.
#[derive(Debug, Clone)]
pub struct PngPreview {
    path:    PathBuf,
    every:   u32,
    seen:    u64,
    written: u64,
}

impl PngPreview {
    /// `every` below 1 is treated as 1
    pub fn new(path: impl Into<PathBuf>, every: u32) -> Self {
        Self {
            path:    path.into(),
            every:   every.max(1),
            seen:    0,
            written: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames written to disk so far
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FramePreview for PngPreview {
    fn wants_frame(&mut self) -> bool {
        let due = self.seen % u64::from(self.every) == 0;
        self.seen += 1;
        due
    }

    fn show(&mut self, frame: &ImageBuffer) -> CaptureResult<()> {
        write_png_with_compression(frame, &self.path, CompressionType::Fast)?;
        self.written += 1;
        debug!("Preview frame {} written to {}", self.seen, self.path.display());
        Ok(())
    }
}
