//! Capture throughput benchmark
//!
//! Repeatedly grabs frames from a [`CaptureBackend`] for a fixed wall-clock
//! duration and reports the average frames per second.
//!
//! ## Key Components
//!
//! - [`Benchmark`]: Builder and timed capture loop
//! - [`CancelFlag`]: Cooperative stop signal, checked once per frame
//! - [`FramePreview`]: Optional per-frame sink, e.g. [`PngPreview`]
//! - [`compare_backends`]: Benchmarks several backends in sequence
//! - [`TimingResult`]: Timing data for a single operation
//!
//! ## FPS semantics
//!
//! Only the time spent inside `grab()` counts towards the average. Preview
//! scaling and encoding are excluded, so the figure overstates the FPS of a
//! pipeline that also displays every frame.
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//!
//! use screengrab_core::{
//!     capture::MockBackend,
//!     model::ColorOrder,
//!     perf::Benchmark,
//! };
//!
//! let mut backend =
//!     MockBackend::new(64, 48, ColorOrder::Bgr).with_delay(Duration::from_millis(5));
//! let result = Benchmark::new(Duration::from_millis(50)).run(&mut backend).unwrap();
//!
//! assert_eq!(result.backend_name, "mock");
//! assert!(result.frame_count > 0);
//! ```
//!
//! [`PngPreview`]: crate::util::preview::PngPreview

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    capture::{CaptureBackend, ImageBuffer, create_backend},
    config::BenchmarkConfig,
    error::CaptureResult,
    model::{BackendKind, BenchmarkResult, CaptureArea, ColorOrder},
    util::preview::PngPreview,
};

/// Cooperative cancellation signal shared between threads
///
/// Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that running benchmarks stop after their current frame
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives captured frames during a benchmark, already scaled
///
/// The benchmark asks [`wants_frame`](FramePreview::wants_frame) once per
/// captured frame and only scales and passes on the frames it accepts.
pub trait FramePreview {
    /// Called once per captured frame, before any scaling
    fn wants_frame(&mut self) -> bool {
        true
    }

    /// Shows one frame; an error aborts the benchmark
    fn show(&mut self, frame: &ImageBuffer) -> CaptureResult<()>;
}

/// Timed capture loop
///
/// The loop runs while the wall clock is before `start + duration`. Each
/// iteration grabs one frame, hands it to the preview if one is attached and
/// wants it, then checks the cancel flag. A duration too long to represent
/// as a deadline runs until cancelled. A cancelled iteration's frame is not counted.
///
/// A failing `grab()` or preview ends the run with that error; no partial
/// result is produced.
pub struct Benchmark<'p> {
    duration: Duration,
    cancel:   Option<CancelFlag>,
    preview:  Option<(&'p mut dyn FramePreview, f32)>,
}

impl<'p> Benchmark<'p> {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            cancel: None,
            preview: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Attaches a preview receiving each frame scaled by `scale`
    pub fn with_preview(mut self, preview: &'p mut dyn FramePreview, scale: f32) -> Self {
        self.preview = Some((preview, scale));
        self
    }

    /// Runs the loop against `backend`
    pub fn run<B>(&mut self, backend: &mut B) -> CaptureResult<BenchmarkResult>
    where
        B: CaptureBackend + ?Sized,
    {
        let started_at = Utc::now();
        let deadline = Instant::now().checked_add(self.duration);
        if deadline.is_none() {
            warn!(
                "Benchmark duration {:?} has no representable deadline; running until cancelled",
                self.duration
            );
        }

        let mut frame_count = 0u64;
        let mut capture_time = Duration::ZERO;
        let mut cancelled = false;

        while deadline.is_none_or(|deadline| Instant::now() < deadline) {
            let t0 = Instant::now();
            let frame = backend.grab()?;
            let dt = t0.elapsed();

            if let Some((preview, scale)) = self.preview.as_mut() {
                if preview.wants_frame() {
                    preview.show(&frame.scale(*scale)?)?;
                }
            }

            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                debug!("Benchmark of {} cancelled after {} frames", backend.name(), frame_count);
                cancelled = true;
                break;
            }

            capture_time += dt;
            frame_count += 1;
        }

        let capture_seconds = capture_time.as_secs_f64();
        let average_fps = if frame_count == 0 || capture_seconds == 0.0 {
            0.0
        } else {
            frame_count as f64 / capture_seconds
        };

        let result = BenchmarkResult {
            backend_name: backend.name().to_string(),
            duration_seconds: self.duration.as_secs_f64(),
            frame_count,
            average_fps,
            capture_seconds,
            cancelled,
            started_at,
        };

        info!("{}", result.summary_line());
        Ok(result)
    }
}

/// Benchmarks each backend in `kinds` in turn
///
/// Every backend is constructed right before its own run, on the calling
/// thread. Remaining backends are skipped once `cancel` is set. When the
/// config names a preview path, each run writes its previews there.
pub fn compare_backends(
    kinds: &[BackendKind],
    area: CaptureArea,
    order: ColorOrder,
    config: &BenchmarkConfig,
    cancel: &CancelFlag,
) -> CaptureResult<Vec<BenchmarkResult>> {
    let duration = config.duration()?;
    let mut results = Vec::with_capacity(kinds.len());

    for &kind in kinds {
        if cancel.is_cancelled() {
            debug!("Skipping {} benchmark after cancellation", kind);
            break;
        }

        info!("Benchmarking {} for {:.1}s on {}", kind, duration.as_secs_f64(), area);
        let mut backend = create_backend(kind, area, order)?;

        let mut preview = config
            .preview_path
            .as_ref()
            .map(|path| PngPreview::new(path.clone(), config.preview_every));

        let mut bench = Benchmark::new(duration).with_cancel(cancel.clone());
        if let Some(preview) = preview.as_mut() {
            bench = bench.with_preview(preview, config.preview_scale);
        }

        results.push(bench.run(&mut backend)?);
    }

    Ok(results)
}

/// Timing data for a single operation
#[derive(Debug, Clone)]
pub struct TimingResult {
    /// Human-readable operation name
    pub operation: String,

    /// Elapsed duration of the operation
    pub duration: Duration,

    /// Whether the operation succeeded
    pub success: bool,
}

impl TimingResult {
    pub fn new(operation: impl Into<String>, duration: Duration, success: bool) -> Self {
        Self {
            operation: operation.into(),
            duration,
            success,
        }
    }

    /// Returns duration in milliseconds
    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }

    /// Returns duration in seconds (floating point)
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }

    /// Returns a human-readable status string ("✓" or "✗")
    pub fn status_symbol(&self) -> &'static str {
        if self.success { "✓" } else { "✗" }
    }

    /// Formats as `<status> <operation> took <secs>s (<ms>ms)`
    pub fn summary_line(&self) -> String {
        format!(
            "{} {} took {:.3}s ({}ms)",
            self.status_symbol(),
            self.operation,
            self.duration_secs(),
            self.duration_ms()
        )
    }
}

/// Runs a fallible operation and returns its result with timing
///
/// ## Example
///
/// ```
/// use screengrab_core::perf::measure_operation;
///
/// let (value, timing) = measure_operation("answer", || Ok::<_, String>(42)).unwrap();
/// assert_eq!(value, 42);
/// assert!(timing.success);
/// ```
pub fn measure_operation<F, T, E>(operation_name: &str, operation: F) -> Result<(T, TimingResult), E>
where
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let result = operation();
    let timing = TimingResult::new(operation_name, start.elapsed(), result.is_ok());

    debug!("{}", timing.summary_line());
    result.map(|value| (value, timing))
}
