//! Capture backend trait and implementations
//!
//! This module provides the core abstraction for grabbing a screen area into
//! an [`ImageBuffer`], plus the two concrete backends built on different OS
//! capture libraries.
//!
//! # Backends
//!
//! | Backend | Library | Native layout | Full screen means |
//! |---------|---------|---------------|-------------------|
//! | [`ScrapBackend`] | `scrap` (DXGI / X11 SHM / CoreGraphics) | BGRA | primary display |
//! | [`XcapBackend`] | `xcap` | RGBA | every monitor, composited |
//! | [`MockBackend`] | none (synthetic) | RGB | configured size |
//!
//! The two real backends do not agree on the pixel dimensions of a full-screen
//! grab on multi-monitor setups. Region grabs agree whenever the region lies
//! on the primary display.
//!
//! # Usage
//!
//! ```rust,ignore
//! use screengrab_core::{
//!     capture::{CaptureBackend, create_backend},
//!     model::{BackendKind, CaptureArea, ColorOrder, Region},
//! };
//!
//! let region = Region::from_ltwh(0, 0, 1920, 1080)?;
//! let mut backend = create_backend(BackendKind::Scrap, region.into(), ColorOrder::Bgr)?;
//! let frame = backend.grab()?;
//! assert_eq!(frame.shape(), (1080, 1920, 3));
//! ```

use tracing::debug;

use crate::{
    error::{CaptureError, CaptureResult},
    model::{BackendKind, CaptureArea, ColorOrder, DisplayServer, Region},
    util::detect::detect_platform,
};

pub mod constants;
pub mod convert;
pub mod image_buffer;
pub mod mock;

#[cfg(feature = "scrap-backend")]
pub mod scrap_backend;

#[cfg(feature = "xcap-backend")]
pub mod xcap_backend;

pub use image_buffer::ImageBuffer;
pub use mock::MockBackend;
#[cfg(feature = "scrap-backend")]
pub use scrap_backend::ScrapBackend;
#[cfg(feature = "xcap-backend")]
pub use xcap_backend::XcapBackend;

/// Capability: grab one frame of a fixed screen area
///
/// Implementations are constructed with a [`CaptureArea`] and a
/// [`ColorOrder`] and keep both unchanged for their whole lifetime.
///
/// # Contract
///
/// - Each [`grab`](CaptureBackend::grab) performs exactly one OS-level capture.
/// - The returned buffer is freshly allocated and owned by the caller; it
///   never aliases memory the backend or the capture library keeps.
/// - OS failures are returned as [`CaptureError`], never swallowed or retried.
///
/// Backends may cache an OS capture session between calls. That is why
/// `grab` takes `&mut self`, and why backends are not required to be `Send`.
pub trait CaptureBackend {
    /// Stable name used in benchmark results and logs
    fn name(&self) -> &str;

    /// Captures the configured area once
    fn grab(&mut self) -> CaptureResult<ImageBuffer>;
}

impl<B: CaptureBackend + ?Sized> CaptureBackend for Box<B> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn grab(&mut self) -> CaptureResult<ImageBuffer> {
        (**self).grab()
    }
}

/// Builds the backend for `kind`
///
/// # Errors
///
/// [`CaptureError::MissingDependency`] when the backend was compiled out via
/// its cargo feature. Construction itself performs no OS calls.
pub fn create_backend(
    kind: BackendKind,
    area: CaptureArea,
    order: ColorOrder,
) -> CaptureResult<Box<dyn CaptureBackend>> {
    debug!("Creating {} backend for area {} ({})", kind, area, order);

    match kind {
        BackendKind::Scrap => {
            #[cfg(feature = "scrap-backend")]
            {
                Ok(Box::new(ScrapBackend::new(area, order)))
            }
            #[cfg(not(feature = "scrap-backend"))]
            {
                Err(compiled_out(kind))
            }
        }
        BackendKind::Xcap => {
            #[cfg(feature = "xcap-backend")]
            {
                Ok(Box::new(XcapBackend::new(area, order)))
            }
            #[cfg(not(feature = "xcap-backend"))]
            {
                Err(compiled_out(kind))
            }
        }
    }
}

/// Error for a backend whose cargo feature is disabled
#[cfg(not(all(feature = "scrap-backend", feature = "xcap-backend")))]
fn compiled_out(kind: BackendKind) -> CaptureError {
    CaptureError::MissingDependency {
        backend: kind.to_string(),
        reason:  format!("compiled without the '{}-backend' feature", kind),
    }
}

/// Fail-fast startup check for a backend
///
/// Verifies that the backend is compiled in, that a display session exists,
/// and that its capture library can see at least one display. Never installs
/// or downloads anything.
///
/// # Errors
///
/// - [`CaptureError::MissingDependency`] - Backend compiled out, or the
///   library cannot initialise
/// - [`CaptureError::NoDisplay`] - No display session detected
pub fn check_backend(kind: BackendKind) -> CaptureResult<()> {
    let platform = detect_platform();
    debug!("Checking {} backend on {} ({})", kind, platform.os, platform.display);

    if platform.display == DisplayServer::None {
        return Err(CaptureError::NoDisplay {
            backend: kind.to_string(),
        });
    }

    match kind {
        BackendKind::Scrap => {
            #[cfg(feature = "scrap-backend")]
            {
                scrap_backend::probe(platform.display)
            }
            #[cfg(not(feature = "scrap-backend"))]
            {
                Err(compiled_out(kind))
            }
        }
        BackendKind::Xcap => {
            #[cfg(feature = "xcap-backend")]
            {
                xcap_backend::probe()
            }
            #[cfg(not(feature = "xcap-backend"))]
            {
                Err(compiled_out(kind))
            }
        }
    }
}

/// Captures once without keeping a backend around
///
/// `color` is `"RGB"` or `"BGR"` and `backend` is `"scrap"` or `"xcap"`, both
/// case-insensitive. `None` for `region` captures the backend's full screen.
///
/// # Errors
///
/// [`CaptureError::InvalidArgument`] for an unknown colour order or backend
/// name, raised before any OS call. Capture failures propagate unchanged.
///
/// # Examples
///
/// ```
/// use screengrab_core::{capture::take_screenshot, error::CaptureError};
///
/// // Validation happens before any capture is attempted
/// let err = take_screenshot(None, "RGB", "XYZ").unwrap_err();
/// assert!(matches!(err, CaptureError::InvalidArgument { .. }));
///
/// let err = take_screenshot(None, "CMYK", "scrap").unwrap_err();
/// assert!(matches!(err, CaptureError::InvalidArgument { .. }));
/// ```
pub fn take_screenshot(
    region: Option<Region>,
    color: &str,
    backend: &str,
) -> CaptureResult<ImageBuffer> {
    let kind: BackendKind = backend.parse()?;
    let order: ColorOrder = color.parse()?;

    grab_once(CaptureArea::from_optional(region), order, kind)
}

/// Typed form of [`take_screenshot`]
pub fn grab_once(
    area: CaptureArea,
    order: ColorOrder,
    kind: BackendKind,
) -> CaptureResult<ImageBuffer> {
    let mut backend = create_backend(kind, area, order)?;
    backend.grab()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_screenshot_rejects_unknown_backend() {
        let err = take_screenshot(None, "rgb", "XYZ").unwrap_err();
        assert!(
            matches!(err, CaptureError::InvalidArgument { ref parameter, .. } if parameter == "backend")
        );
    }

    #[test]
    fn test_take_screenshot_rejects_unknown_color() {
        let region = Region::from_ltwh(0, 0, 10, 10).ok();
        let err = take_screenshot(region, "CMYK", "xcap").unwrap_err();
        assert!(
            matches!(err, CaptureError::InvalidArgument { ref parameter, .. } if parameter == "color")
        );
    }

    #[test]
    fn test_boxed_backend_forwards() {
        let mut boxed: Box<dyn CaptureBackend> =
            Box::new(MockBackend::new(4, 3, ColorOrder::Bgr));

        assert_eq!(boxed.name(), "mock");
        assert_eq!(boxed.grab().unwrap().shape(), (3, 4, 3));
    }

    #[cfg(feature = "scrap-backend")]
    #[test]
    fn test_create_backend_names() {
        let scrap = create_backend(BackendKind::Scrap, CaptureArea::FullScreen, ColorOrder::Rgb)
            .unwrap();
        assert_eq!(scrap.name(), "scrap");
    }

    #[cfg(feature = "xcap-backend")]
    #[test]
    fn test_create_xcap_backend_name() {
        let xcap = create_backend(BackendKind::Xcap, CaptureArea::FullScreen, ColorOrder::Rgb)
            .unwrap();
        assert_eq!(xcap.name(), "xcap");
    }
}
