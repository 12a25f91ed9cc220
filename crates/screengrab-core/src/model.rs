//! Data models and type definitions for screengrab
//!
//! This module defines the core types used throughout the library:
//! - Capture geometry ([`Rect`], [`Region`], [`CaptureArea`])
//! - Backend and colour-order selection ([`BackendKind`], [`ColorOrder`])
//! - Benchmark output ([`BenchmarkResult`])
//! - Platform detection types ([`DisplayServer`], [`PlatformInfo`])

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, CaptureResult};

/// Labeled-field rectangle as written by callers and config files
///
/// A `Rect` is unvalidated input; convert it with [`Region::from_rect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left:   u32,
    pub top:    u32,
    pub width:  u32,
    pub height: u32,
}

/// Validated capture rectangle
///
/// Coordinates are non-negative, `width` and `height` are non-zero, and the
/// right/bottom edges fit in a `u32`. A `Region` cannot be changed after
/// construction. No screen-bounds check happens here; backends clip.
///
/// # Examples
///
/// ```
/// use screengrab_core::model::{Rect, Region};
///
/// let labeled = Region::from_rect(Rect { left: 0, top: 0, width: 1920, height: 1080 }).unwrap();
/// let positional = Region::from_ltwh(0, 0, 1920, 1080).unwrap();
/// assert_eq!(labeled, positional);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Rect", into = "Rect")]
pub struct Region {
    left:   u32,
    top:    u32,
    width:  u32,
    height: u32,
}

impl Region {
    /// Builds a region from the labeled-field form
    pub fn from_rect(rect: Rect) -> CaptureResult<Self> {
        Self::from_ltwh(rect.left, rect.top, rect.width, rect.height)
    }

    /// Builds a region from the positional `(left, top, width, height)` form
    pub fn from_ltwh(left: u32, top: u32, width: u32, height: u32) -> CaptureResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::invalid_argument(
                "region",
                format!("width and height must be non-zero, got {}x{}", width, height),
            ));
        }
        if left.checked_add(width).is_none() || top.checked_add(height).is_none() {
            return Err(CaptureError::invalid_argument(
                "region",
                format!(
                    "region {}x{} at ({}, {}) overflows the coordinate space",
                    width, height, left, top
                ),
            ));
        }

        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Returns `(left, top, width, height)`
    pub fn as_ltwh(&self) -> (u32, u32, u32, u32) {
        (self.left, self.top, self.width, self.height)
    }

    /// Clips this region against a surface whose top-left corner sits at
    /// `(origin_x, origin_y)` in the same coordinate space
    ///
    /// Returns the intersection expressed relative to the surface origin, or
    /// `None` when the two do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::model::Region;
    ///
    /// let region = Region::from_ltwh(1800, 1000, 400, 400).unwrap();
    /// let clipped = region.clip_to(0, 0, 1920, 1080).unwrap();
    /// assert_eq!(clipped.as_ltwh(), (1800, 1000, 120, 80));
    ///
    /// // Second monitor to the right of the first one
    /// let on_second = Region::from_ltwh(2000, 10, 100, 100).unwrap();
    /// let relative = on_second.clip_to(1920, 0, 1280, 1024).unwrap();
    /// assert_eq!(relative.as_ltwh(), (80, 10, 100, 100));
    /// ```
    pub fn clip_to(
        &self,
        origin_x: i64,
        origin_y: i64,
        surface_width: u32,
        surface_height: u32,
    ) -> Option<Region> {
        let left = (self.left as i64 - origin_x).max(0);
        let top = (self.top as i64 - origin_y).max(0);
        let right = (self.right() as i64 - origin_x).min(surface_width as i64);
        let bottom = (self.bottom() as i64 - origin_y).min(surface_height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(Region {
            left:   left as u32,
            top:    top as u32,
            width:  (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

impl TryFrom<Rect> for Region {
    type Error = CaptureError;

    fn try_from(rect: Rect) -> CaptureResult<Self> {
        Self::from_rect(rect)
    }
}

impl TryFrom<(u32, u32, u32, u32)> for Region {
    type Error = CaptureError;

    fn try_from((left, top, width, height): (u32, u32, u32, u32)) -> CaptureResult<Self> {
        Self::from_ltwh(left, top, width, height)
    }
}

impl From<Region> for Rect {
    fn from(region: Region) -> Self {
        Rect {
            left:   region.left,
            top:    region.top,
            width:  region.width,
            height: region.height,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

impl FromStr for Region {
    type Err = CaptureError;

    /// Parses the `LEFT,TOP,WIDTH,HEIGHT` form used on the command line
    fn from_str(s: &str) -> CaptureResult<Self> {
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                CaptureError::invalid_argument("region", format!("'{}' is not LEFT,TOP,WIDTH,HEIGHT: {}", s, e))
            })?;

        match parts.as_slice() {
            [left, top, width, height] => Self::from_ltwh(*left, *top, *width, *height),
            _ => Err(CaptureError::invalid_argument(
                "region",
                format!("expected 4 comma-separated values, got {}", parts.len()),
            )),
        }
    }
}

/// What a backend should capture: a region or everything it can see
///
/// "Everything" is backend-defined: `scrap` captures the primary display,
/// `xcap` composites every monitor into one virtual-desktop image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "AreaRepr", into = "AreaRepr")]
pub enum CaptureArea {
    Region(Region),
    #[default]
    FullScreen,
}

impl CaptureArea {
    /// Maps an optional region to an area, `None` meaning full screen
    pub fn from_optional(region: Option<Region>) -> Self {
        region.map_or(CaptureArea::FullScreen, CaptureArea::Region)
    }

    pub fn region(&self) -> Option<Region> {
        match self {
            CaptureArea::Region(region) => Some(*region),
            CaptureArea::FullScreen => None,
        }
    }
}

impl From<Region> for CaptureArea {
    fn from(region: Region) -> Self {
        CaptureArea::Region(region)
    }
}

impl fmt::Display for CaptureArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureArea::Region(region) => write!(f, "{}", region),
            CaptureArea::FullScreen => write!(f, "fullscreen"),
        }
    }
}

impl FromStr for CaptureArea {
    type Err = CaptureError;

    fn from_str(s: &str) -> CaptureResult<Self> {
        if s.trim().eq_ignore_ascii_case("fullscreen") {
            Ok(CaptureArea::FullScreen)
        } else {
            s.parse::<Region>().map(CaptureArea::Region)
        }
    }
}

/// Wire form of [`CaptureArea`]: a rectangle object or the `"fullscreen"` keyword
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AreaRepr {
    Keyword(String),
    Rect(Rect),
}

impl TryFrom<AreaRepr> for CaptureArea {
    type Error = CaptureError;

    fn try_from(repr: AreaRepr) -> CaptureResult<Self> {
        match repr {
            AreaRepr::Keyword(keyword) if keyword.eq_ignore_ascii_case("fullscreen") => {
                Ok(CaptureArea::FullScreen)
            }
            AreaRepr::Keyword(other) => Err(CaptureError::invalid_argument(
                "region",
                format!("unknown region keyword '{}'", other),
            )),
            AreaRepr::Rect(rect) => Region::from_rect(rect).map(CaptureArea::Region),
        }
    }
}

impl From<CaptureArea> for AreaRepr {
    fn from(area: CaptureArea) -> Self {
        match area {
            CaptureArea::Region(region) => AreaRepr::Rect(region.into()),
            CaptureArea::FullScreen => AreaRepr::Keyword("fullscreen".to_string()),
        }
    }
}

/// Channel order of a 3-channel image buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorOrder {
    #[default]
    Rgb,
    Bgr,
}

impl ColorOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorOrder::Rgb => "RGB",
            ColorOrder::Bgr => "BGR",
        }
    }

    /// The other order
    pub fn reversed(&self) -> Self {
        match self {
            ColorOrder::Rgb => ColorOrder::Bgr,
            ColorOrder::Bgr => ColorOrder::Rgb,
        }
    }
}

impl fmt::Display for ColorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColorOrder {
    type Err = CaptureError;

    fn from_str(s: &str) -> CaptureResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RGB" => Ok(ColorOrder::Rgb),
            "BGR" => Ok(ColorOrder::Bgr),
            _ => Err(CaptureError::invalid_argument(
                "color",
                format!("unknown colour order '{}', expected RGB or BGR", s),
            )),
        }
    }
}

/// The two capture libraries a backend can be built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Raw composited frames via `scrap` (native BGRA)
    #[default]
    Scrap,
    /// Per-monitor images via `xcap` (native RGBA)
    Xcap,
}

impl BackendKind {
    /// Every kind, in the order the comparison benchmark runs them
    pub const ALL: [BackendKind; 2] = [BackendKind::Scrap, BackendKind::Xcap];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Scrap => "scrap",
            BackendKind::Xcap => "xcap",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = CaptureError;

    fn from_str(s: &str) -> CaptureResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "scrap" => Ok(BackendKind::Scrap),
            "xcap" => Ok(BackendKind::Xcap),
            _ => Err(CaptureError::invalid_argument(
                "backend",
                format!("unknown backend '{}', expected scrap or xcap", s),
            )),
        }
    }
}

/// Outcome of one benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Name reported by the benchmarked backend
    pub backend_name:     String,
    /// Configured run length
    pub duration_seconds: f64,
    /// Frames counted towards the average
    pub frame_count:      u64,
    /// `frame_count / capture_seconds`, or 0 when either is zero
    pub average_fps:      f64,
    /// Time accumulated inside `grab()` calls only
    pub capture_seconds:  f64,
    /// Whether the run ended through the cancel flag
    pub cancelled:        bool,
    /// When the run started
    pub started_at:       DateTime<Utc>,
}

impl BenchmarkResult {
    /// One-line summary in the `[name] Duration: Ds, Frames: N, Avg FPS: F` form
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] Duration: {}s, Frames: {}, Avg FPS: {:.2}",
            self.backend_name, self.duration_seconds, self.frame_count, self.average_fps
        )
    }
}

/// Display server detected for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayServer {
    /// No display detected
    None,
    Wayland,
    X11,
    Windows,
    #[serde(rename = "macos")]
    MacOS,
}

impl DisplayServer {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayServer::None => "none",
            DisplayServer::Wayland => "wayland",
            DisplayServer::X11 => "x11",
            DisplayServer::Windows => "windows",
            DisplayServer::MacOS => "macos",
        }
    }
}

impl fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform information including OS and display server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system name (e.g., "linux", "windows", "macos")
    pub os:      String,
    /// Detected display server
    pub display: DisplayServer,
}

impl PlatformInfo {
    pub fn new(os: String, display: DisplayServer) -> Self {
        Self { os, display }
    }
}
