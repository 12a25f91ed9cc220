//! Benchmark configuration
//!
//! Settings are layered: defaults, then an optional JSON file, then
//! environment variables, then whatever the caller (usually the CLI) sets
//! explicitly. Call [`BenchmarkConfig::validate`] after the last layer.
//!
//! | Environment Variable | Field |
//! |---------------------|-------|
//! | `SCREENGRAB_BENCH_DURATION_SECS` | `duration_seconds` |
//! | `SCREENGRAB_BACKEND` | `backend` |
//! | `SCREENGRAB_COLOR` | `color` |
//!
//! # Example file
//!
//! ```json
//! {
//!   "region": { "left": 0, "top": 0, "width": 1280, "height": 720 },
//!   "duration_seconds": 5,
//!   "backend": "xcap",
//!   "color": "RGB"
//! }
//! ```

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    capture::constants::{DEFAULT_BENCH_DURATION_SECS, DEFAULT_BENCH_REGION, DEFAULT_PREVIEW_SCALE},
    error::{CaptureError, CaptureResult},
    model::{BackendKind, CaptureArea, ColorOrder, Region},
};

pub const ENV_DURATION: &str = "SCREENGRAB_BENCH_DURATION_SECS";
pub const ENV_BACKEND: &str = "SCREENGRAB_BACKEND";
pub const ENV_COLOR: &str = "SCREENGRAB_COLOR";

/// Settings for a benchmark session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// Area captured by every backend
    pub region:           CaptureArea,
    /// Wall-clock length of each run
    pub duration_seconds: f64,
    /// Backend to run; `None` runs every backend in sequence
    pub backend:          Option<BackendKind>,
    pub color:            ColorOrder,
    /// PNG file receiving preview frames
    pub preview_path:     Option<PathBuf>,
    pub preview_scale:    f32,
    /// Write a preview every N frames
    pub preview_every:    u32,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        let (left, top, width, height) = DEFAULT_BENCH_REGION;

        Self {
            region:           Region::from_ltwh(left, top, width, height)
                .map(CaptureArea::Region)
                .unwrap_or_default(),
            duration_seconds: DEFAULT_BENCH_DURATION_SECS,
            backend:          None,
            color:            ColorOrder::Bgr,
            preview_path:     None,
            preview_scale:    DEFAULT_PREVIEW_SCALE,
            preview_every:    1,
        }
    }
}

impl BenchmarkConfig {
    /// Parses a config from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> CaptureResult<Self> {
        serde_json::from_str(json).map_err(|e| CaptureError::Config(e.to_string()))
    }

    /// Reads and parses a JSON config file
    pub fn from_json_file(path: &Path) -> CaptureResult<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!("Loaded benchmark config from {}", path.display());
        Ok(config)
    }

    /// Applies `SCREENGRAB_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> CaptureResult<()> {
        self.apply_overrides_with(|key| env::var(key).ok())
    }

    fn apply_overrides_with<F>(&mut self, env_provider: F) -> CaptureResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| env_provider(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup(ENV_DURATION) {
            self.duration_seconds = value.trim().parse().map_err(|_| {
                CaptureError::invalid_argument(
                    "duration_seconds",
                    format!("{}='{}' is not a number", ENV_DURATION, value),
                )
            })?;
        }
        if let Some(value) = lookup(ENV_BACKEND) {
            self.backend = Some(value.parse()?);
        }
        if let Some(value) = lookup(ENV_COLOR) {
            self.color = value.parse()?;
        }
        Ok(())
    }

    /// Checks value ranges
    ///
    /// # Errors
    ///
    /// [`CaptureError::InvalidArgument`] for a negative, non-finite or
    /// unreachably long duration, a preview scale outside `0.1..=2.0`, or `preview_every` of 0.
    pub fn validate(&self) -> CaptureResult<()> {
        self.duration()?;

        if !(0.1..=2.0).contains(&self.preview_scale) {
            return Err(CaptureError::invalid_argument(
                "preview_scale",
                format!("{} is outside 0.1..=2.0", self.preview_scale),
            ));
        }
        if self.preview_every == 0 {
            return Err(CaptureError::invalid_argument(
                "preview_every",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// Run length as a [`Duration`]
    ///
    /// The duration must be reachable from now on the monotonic clock.
    pub fn duration(&self) -> CaptureResult<Duration> {
        if self.duration_seconds < 0.0 {
            return Err(CaptureError::invalid_argument(
                "duration_seconds",
                format!("{} is negative", self.duration_seconds),
            ));
        }
        let duration = Duration::try_from_secs_f64(self.duration_seconds).map_err(|e| {
            CaptureError::invalid_argument(
                "duration_seconds",
                format!("{}: {}", self.duration_seconds, e),
            )
        })?;

        if Instant::now().checked_add(duration).is_none() {
            return Err(CaptureError::invalid_argument(
                "duration_seconds",
                format!("{} is too long to schedule", self.duration_seconds),
            ));
        }
        Ok(duration)
    }

    /// Backends to benchmark, in run order
    pub fn backends(&self) -> Vec<BackendKind> {
        match self.backend {
            Some(kind) => vec![kind],
            None => BackendKind::ALL.to_vec(),
        }
    }
}
