//! Benchmark harness integration tests
//!
//! Drive [`Benchmark`] with the synthetic [`MockBackend`], so these run on
//! headless machines. Timing assertions are loose enough for noisy CI
//! runners.

use std::{
    thread,
    time::{Duration, Instant},
};

use screengrab_core::{
    capture::{CaptureBackend, ImageBuffer, MockBackend},
    error::{CaptureError, CaptureResult},
    model::ColorOrder,
    perf::{Benchmark, CancelFlag, FramePreview},
};
use screengrab_test_utils::timing::{
    assert_duration_above, assert_duration_below, assert_within, measure_sync,
};

fn mock(delay_ms: u64) -> MockBackend {
    MockBackend::new(64, 36, ColorOrder::Bgr).with_delay(Duration::from_millis(delay_ms))
}

#[test]
fn zero_duration_reports_nothing() {
    let mut backend = mock(1);
    let result = Benchmark::new(Duration::ZERO).run(&mut backend).unwrap();

    assert_eq!(result.frame_count, 0);
    assert_eq!(result.average_fps, 0.0);
    assert_eq!(result.capture_seconds, 0.0);
    assert_eq!(result.backend_name, "mock");
}

#[test]
fn frame_count_tracks_delay() {
    let mut backend = mock(25);

    let (result, elapsed) = measure_sync("bench_250ms", || {
        Benchmark::new(Duration::from_millis(250)).run(&mut backend)
    });
    let result = result.unwrap();

    // 250ms / 25ms per frame, plus one frame that may start just before the deadline
    assert!(
        (5..=11).contains(&result.frame_count),
        "unexpected frame count {}",
        result.frame_count
    );
    assert_eq!(backend.calls(), result.frame_count);

    // Sleeps never undershoot, so the average sits at or a little below 1/25ms
    assert_within(result.average_fps, 40.0, 0.25, "average_fps");

    assert_duration_above(elapsed, Duration::from_millis(250), "bench_250ms");
    assert_duration_below(elapsed, Duration::from_secs(2), "bench_250ms");
}

/// Preview that takes far longer than a grab
struct SlowPreview {
    delay: Duration,
    shown: u64,
}

impl FramePreview for SlowPreview {
    fn show(&mut self, _frame: &ImageBuffer) -> CaptureResult<()> {
        thread::sleep(self.delay);
        self.shown += 1;
        Ok(())
    }
}

#[test]
fn fps_excludes_preview_time() {
    let mut backend = mock(5);
    let mut preview = SlowPreview {
        delay: Duration::from_millis(20),
        shown: 0,
    };

    let (result, elapsed) = measure_sync("bench_with_slow_preview", || {
        Benchmark::new(Duration::from_millis(300))
            .with_preview(&mut preview, 0.5)
            .run(&mut backend)
    });
    let result = result.unwrap();

    assert!(result.frame_count > 0);
    assert_eq!(preview.shown, result.frame_count);

    // Around 1/5ms, nowhere near the ~40 fps of grab plus preview
    assert_within(result.average_fps, 200.0, 0.4, "average_fps");
    assert!(
        result.capture_seconds < elapsed.as_secs_f64() / 2.0,
        "capture {:.3}s is not well below wall clock {:.3}s",
        result.capture_seconds,
        elapsed.as_secs_f64()
    );
}

#[test]
fn failure_on_third_call_propagates() {
    let mut backend = mock(1).fail_on_call(3);

    let err = Benchmark::new(Duration::from_secs(5))
        .run(&mut backend)
        .unwrap_err();

    assert!(matches!(err, CaptureError::CaptureFailed { .. }));
    assert_eq!(backend.calls(), 3);
}

#[test]
fn cancel_from_another_thread_stops_run() {
    let cancel = CancelFlag::new();
    let remote = cancel.clone();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(60));
        remote.cancel();
    });

    let mut backend = mock(5);
    let start = Instant::now();
    let result = Benchmark::new(Duration::from_secs(10))
        .with_cancel(cancel)
        .run(&mut backend)
        .unwrap();
    canceller.join().unwrap();

    assert!(result.cancelled);
    assert!(result.frame_count > 0);
    // The grab in flight when the flag was seen is not counted
    assert_eq!(backend.calls(), result.frame_count + 1);
    assert_duration_below(start.elapsed(), Duration::from_secs(2), "cancelled bench");
}

#[test]
fn boxed_backend_runs() {
    let mut backend: Box<dyn CaptureBackend> = Box::new(mock(2));
    let result = Benchmark::new(Duration::from_millis(20)).run(&mut backend).unwrap();

    assert_eq!(result.backend_name, "mock");
    assert!(!result.cancelled);
    assert!(result.summary_line().starts_with("[mock] Duration: 0.02s, Frames: "));
}
