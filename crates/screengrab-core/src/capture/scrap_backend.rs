//! Capture through the `scrap` crate
//!
//! `scrap` wraps DXGI desktop duplication on Windows, X11 shared memory on
//! Linux and CoreGraphics on macOS. It only exposes whole displays, as BGRA
//! frames borrowed from memory it reuses on the next call. This backend
//! always captures the primary display and crops the configured region out
//! of it.
//!
//! A `frame()` call reports `WouldBlock` while no new frame is ready. Before
//! the first frame the backend polls until [`scrap_frame_timeout_ms`]
//! elapses. After that it keeps a copy of the last frame and converts it
//! again, since DXGI desktop duplication keeps blocking for as long as the
//! desktop does not change.

use std::{
    io::{self, ErrorKind},
    thread,
    time::{Duration, Instant},
};

use scrap::{Capturer, Display};
use tracing::{debug, error, trace, warn};

use super::{
    CaptureBackend, ImageBuffer,
    constants::{scrap_frame_timeout_ms, scrap_poll_interval_ms},
    convert::{SourceFrame, SourceLayout, to_three_channel},
};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{CaptureArea, ColorOrder, DisplayServer},
};

const NAME: &str = "scrap";

/// Backend built on `scrap`
///
/// Region coordinates are relative to the primary display. The OS capturer
/// is opened on the first grab and reused until a grab fails.
pub struct ScrapBackend {
    area:   CaptureArea,
    order:  ColorOrder,
    reader: Option<FrameReader<Capturer>>,
}

impl ScrapBackend {
    pub fn new(area: CaptureArea, order: ColorOrder) -> Self {
        Self {
            area,
            order,
            reader: None,
        }
    }
}

impl std::fmt::Debug for ScrapBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapBackend")
            .field("area", &self.area)
            .field("order", &self.order)
            .field("open", &self.reader.is_some())
            .finish()
    }
}

impl CaptureBackend for ScrapBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn grab(&mut self) -> CaptureResult<ImageBuffer> {
        let mut reader = match self.reader.take() {
            Some(reader) => reader,
            None => FrameReader::new(open_primary()?),
        };

        let result = reader.read(self.area, self.order);
        match &result {
            Ok(_) => self.reader = Some(reader),
            Err(e) => debug!("Dropping scrap capturer after error: {}", e),
        }
        result
    }
}

fn failed(e: io::Error) -> CaptureError {
    error!("scrap capture failed: {}", e);
    CaptureError::capture_failed(NAME, e)
}

fn open_primary() -> CaptureResult<Capturer> {
    let display = Display::primary().map_err(failed)?;
    let capturer = Capturer::new(display).map_err(failed)?;
    debug!("Opened scrap capturer {}x{}", capturer.width(), capturer.height());
    Ok(capturer)
}

/// Something that yields BGRA frames of a fixed size
trait FrameSource {
    fn size(&self) -> (u32, u32);

    /// Copies the next frame into `buf`, leaving it untouched on error
    fn copy_frame(&mut self, buf: &mut Vec<u8>) -> io::Result<()>;
}

impl FrameSource for Capturer {
    fn size(&self) -> (u32, u32) {
        (self.width() as u32, self.height() as u32)
    }

    fn copy_frame(&mut self, buf: &mut Vec<u8>) -> io::Result<()> {
        let frame = self.frame()?;
        buf.clear();
        buf.extend_from_slice(&frame);
        Ok(())
    }
}

/// Frame source plus a copy of the last frame it delivered
struct FrameReader<S> {
    source: S,
    last:   Vec<u8>,
}

impl<S: FrameSource> FrameReader<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            last: Vec::new(),
        }
    }

    /// Reads one frame and converts the configured area
    fn read(&mut self, area: CaptureArea, order: ColorOrder) -> CaptureResult<ImageBuffer> {
        let (width, height) = self.source.size();
        if height == 0 {
            return Err(CaptureError::capture_failed(NAME, "display has zero height"));
        }

        let timeout_ms = scrap_frame_timeout_ms();
        let poll = Duration::from_millis(scrap_poll_interval_ms());
        let start = Instant::now();

        loop {
            match self.source.copy_frame(&mut self.last) {
                Ok(()) => break,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if !self.last.is_empty() {
                        trace!("No new scrap frame, converting the previous one");
                        break;
                    }
                    if start.elapsed() >= Duration::from_millis(timeout_ms) {
                        return Err(CaptureError::FrameTimeout {
                            backend:     NAME.to_string(),
                            duration_ms: timeout_ms,
                        });
                    }
                    thread::sleep(poll);
                }
                Err(e) => return Err(failed(e)),
            }
        }

        // scrap pads rows on some platforms
        let stride = self.last.len() / height as usize;
        let source = SourceFrame::new(&self.last, width, height, stride, SourceLayout::Bgra)?;

        let region = match area {
            CaptureArea::FullScreen => source
                .full_region()
                .ok_or_else(|| CaptureError::capture_failed(NAME, "display is empty"))?,
            CaptureArea::Region(region) => {
                let clipped = region.clip_to(0, 0, width, height).ok_or(
                    CaptureError::RegionOutOfBounds {
                        region,
                        surface_width: width,
                        surface_height: height,
                    },
                )?;
                if clipped != region {
                    warn!("Region {} clipped to {} on the primary display", region, clipped);
                }
                clipped
            }
        };

        to_three_channel(&source, region, order)
    }
}

/// Checks that scrap can see a display
pub(crate) fn probe(display: DisplayServer) -> CaptureResult<()> {
    if display == DisplayServer::Wayland {
        warn!("scrap needs X11; a Wayland session only works through XWayland");
    }

    let displays = Display::all().map_err(|e| CaptureError::MissingDependency {
        backend: NAME.to_string(),
        reason:  e.to_string(),
    })?;

    if displays.is_empty() {
        return Err(CaptureError::NoDisplay {
            backend: NAME.to_string(),
        });
    }

    debug!("scrap sees {} display(s)", displays.len());
    Ok(())
}
