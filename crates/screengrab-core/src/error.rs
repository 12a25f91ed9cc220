//! Error types for screen capture operations
//!
//! This module defines the error taxonomy with user-facing messages and
//! actionable remediation hints. Validation errors are raised before any OS
//! call is attempted; capture errors surface at the failing `grab()` call.
//! Nothing in this crate catches and suppresses a `CaptureError`.

use crate::model::Region;

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Error type for screen capture and benchmark operations
///
/// Each variant includes detailed context and provides remediation hints
/// through the `remediation_hint()` method.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Invalid argument provided (backend name, colour order, region, config)
    #[error("Invalid argument '{parameter}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument
        parameter: String,
        /// Reason why it's invalid
        reason:    String,
    },

    /// Underlying OS capture call failed
    #[error("Capture via {backend} failed: {reason}")]
    CaptureFailed {
        /// Backend that attempted the capture
        backend: String,
        /// Message reported by the capture library
        reason:  String,
    },

    /// No display session is available to capture from
    #[error("No display available for {backend} capture")]
    NoDisplay {
        /// Backend that needed a display
        backend: String,
    },

    /// Requested region does not intersect the captured surface
    #[error(
        "Region {region} lies outside the {surface_width}x{surface_height} capture surface"
    )]
    RegionOutOfBounds {
        /// The requested region
        region:         Region,
        /// Width of the surface the backend captured
        surface_width:  u32,
        /// Height of the surface the backend captured
        surface_height: u32,
    },

    /// The capture library never produced a frame
    #[error("{backend} produced no frame within {duration_ms}ms")]
    FrameTimeout {
        /// Backend that was polled
        backend:     String,
        /// How long the backend was polled for
        duration_ms: u64,
    },

    /// Capture library is not compiled in or cannot initialise
    #[error("Capture backend {backend} is unavailable: {reason}")]
    MissingDependency {
        /// Backend that is missing
        backend: String,
        /// Why it is unavailable
        reason:  String,
    },

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing or encoding error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptureError {
    /// Shorthand for an [`CaptureError::InvalidArgument`]
    pub fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        CaptureError::InvalidArgument {
            parameter: parameter.into(),
            reason:    reason.into(),
        }
    }

    /// Shorthand for a [`CaptureError::CaptureFailed`]
    pub fn capture_failed(backend: impl Into<String>, reason: impl ToString) -> Self {
        CaptureError::CaptureFailed {
            backend: backend.into(),
            reason:  reason.to_string(),
        }
    }

    /// Returns true for errors raised by input validation, before any OS call
    pub fn is_validation(&self) -> bool {
        matches!(self, CaptureError::InvalidArgument { .. } | CaptureError::Config(_))
    }

    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::error::CaptureError;
    ///
    /// let error = CaptureError::invalid_argument("backend", "unknown backend 'XYZ'");
    /// assert!(error.remediation_hint().contains("scrap"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::InvalidArgument { parameter, .. } => match parameter.as_str() {
                "backend" => "Backend must be 'scrap' or 'xcap' (case-insensitive).",
                "color" => "Colour order must be 'RGB' or 'BGR' (case-insensitive).",
                "region" => {
                    "Regions are LEFT,TOP,WIDTH,HEIGHT with non-negative integers and a non-zero \
                     width and height, or the keyword 'fullscreen'."
                }
                "duration_seconds" => "Benchmark duration must be a finite, non-negative number.",
                "preview_scale" => "Preview scale must be between 0.1 and 2.0.",
                _ => "Check the argument value against the documentation.",
            },
            CaptureError::CaptureFailed { backend, .. } => match backend.as_str() {
                "scrap" => {
                    "The scrap capturer failed. On Linux it requires an X11 session (XWayland \
                     is not enough); on macOS grant Screen Recording permission."
                }
                "xcap" => {
                    "xcap could not capture the monitor. Check screen recording permissions and \
                     that the compositor allows screenshots."
                }
                _ => "The capture call failed. Check display permissions and retry.",
            },
            CaptureError::NoDisplay { .. } => {
                "No display session detected. Run inside a desktop session with DISPLAY or \
                 WAYLAND_DISPLAY set, or use xvfb-run on headless machines."
            }
            CaptureError::RegionOutOfBounds { .. } => {
                "Pick a region whose top-left corner lies on a connected monitor, or capture the \
                 full screen instead."
            }
            CaptureError::FrameTimeout { .. } => {
                "The capture library did not deliver a frame in time. Raise \
                 SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS or try the xcap backend."
            }
            CaptureError::MissingDependency { .. } => {
                "Rebuild with the matching cargo feature ('scrap-backend' or 'xcap-backend') and \
                 make sure the platform capture libraries (e.g. libxcb) are installed."
            }
            CaptureError::Io(_) => {
                "An I/O error occurred. Check file permissions, disk space, and system resources."
            }
            CaptureError::Image(_) => {
                "Image processing failed. Ensure the output path has a supported extension."
            }
            CaptureError::Config(_) => {
                "The configuration file is not valid JSON for a benchmark configuration."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let error = CaptureError::invalid_argument("color", "unknown colour order 'CMYK'");

        let msg = error.to_string();
        assert!(msg.contains("Invalid argument"));
        assert!(msg.contains("color"));
        assert!(msg.contains("CMYK"));
    }

    #[test]
    fn test_invalid_argument_remediation() {
        let backend = CaptureError::invalid_argument("backend", "x");
        assert!(backend.remediation_hint().contains("'scrap' or 'xcap'"));

        let color = CaptureError::invalid_argument("color", "x");
        assert!(color.remediation_hint().contains("'RGB' or 'BGR'"));

        let region = CaptureError::invalid_argument("region", "x");
        assert!(region.remediation_hint().contains("fullscreen"));
    }

    #[test]
    fn test_capture_failed_message() {
        let error = CaptureError::capture_failed("xcap", "monitor gone");

        let msg = error.to_string();
        assert!(msg.contains("xcap"));
        assert!(msg.contains("monitor gone"));
        assert!(error.remediation_hint().contains("xcap"));
    }

    #[test]
    fn test_scrap_failure_mentions_x11() {
        let error = CaptureError::capture_failed("scrap", "BadAccess");
        assert!(error.remediation_hint().contains("X11"));
    }

    #[test]
    fn test_region_out_of_bounds_message() {
        let region = Region::from_ltwh(5000, 0, 10, 10).unwrap();
        let error = CaptureError::RegionOutOfBounds {
            region,
            surface_width: 1920,
            surface_height: 1080,
        };

        let msg = error.to_string();
        assert!(msg.contains("5000,0,10,10"));
        assert!(msg.contains("1920x1080"));
    }

    #[test]
    fn test_frame_timeout_message() {
        let error = CaptureError::FrameTimeout {
            backend:     "scrap".to_string(),
            duration_ms: 2000,
        };

        assert!(error.to_string().contains("2000ms"));
        assert!(error.remediation_hint().contains("SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS"));
    }

    #[test]
    fn test_missing_dependency_remediation() {
        let error = CaptureError::MissingDependency {
            backend: "scrap".to_string(),
            reason:  "compiled without the 'scrap-backend' feature".to_string(),
        };

        assert!(error.to_string().contains("unavailable"));
        assert!(error.remediation_hint().contains("cargo feature"));
    }

    #[test]
    fn test_no_display_remediation() {
        let error = CaptureError::NoDisplay {
            backend: "xcap".to_string(),
        };
        assert!(error.remediation_hint().contains("DISPLAY"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: CaptureError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.remediation_hint().contains("permissions"));
    }

    #[test]
    fn test_is_validation() {
        assert!(CaptureError::invalid_argument("backend", "x").is_validation());
        assert!(CaptureError::Config("bad".to_string()).is_validation());
        assert!(!CaptureError::capture_failed("xcap", "boom").is_validation());
    }
}
