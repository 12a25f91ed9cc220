//! Timing and performance measurement utilities
//!
//! Re-exports the operation timing helpers from `screengrab-core` and adds
//! assertions suited to wall-clock based tests. Benchmarks measured on
//! shared CI machines are noisy, so prefer the tolerance-based helpers.
//!
//! # Re-exports from screengrab-core
//!
//! - [`TimingResult`]: Structured timing data for operations
//! - [`measure_operation`]: Fallible operation timing wrapper
//!
//! # Additional Utilities
//!
//! - [`measure_sync`]: Simple synchronous timing wrapper
//! - [`assert_duration_below`]: Assert duration is under threshold
//! - [`assert_duration_above`]: Assert duration exceeds minimum
//! - [`assert_within`]: Assert a measured value is near an expected one

use std::time::{Duration, Instant};

pub use screengrab_core::perf::{TimingResult, measure_operation};

/// Measure the duration of a synchronous operation
///
/// # Example
///
/// ```
/// use screengrab_test_utils::timing::measure_sync;
///
/// let (result, duration) = measure_sync("compute", || 6 * 7);
/// assert_eq!(result, 42);
/// println!("Computation took {:.2}ms", duration.as_secs_f64() * 1000.0);
/// ```
pub fn measure_sync<F, T>(name: &str, f: F) -> (T, Duration)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    let elapsed = start.elapsed();
    println!("[TIMING] {}: {:.2}ms", name, elapsed.as_secs_f64() * 1000.0);
    (result, elapsed)
}

/// Asserts that a duration is below a threshold
///
/// # Example
///
/// ```
/// use screengrab_test_utils::timing::assert_duration_below;
/// use std::time::Duration;
///
/// assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "capture");
/// ```
///
/// # Panics
///
/// Panics if `actual > threshold` with a message showing the excess time.
pub fn assert_duration_below(actual: Duration, threshold: Duration, operation: &str) {
    assert!(
        actual <= threshold,
        "{} took {:.3}s, expected <={:.3}s ({}ms over threshold)",
        operation,
        actual.as_secs_f64(),
        threshold.as_secs_f64(),
        (actual.as_millis() as i128) - (threshold.as_millis() as i128)
    );
}

/// Asserts that a duration is above a minimum
///
/// Catches loops that ended early or operations that never ran.
///
/// # Panics
///
/// Panics if `actual < minimum`.
pub fn assert_duration_above(actual: Duration, minimum: Duration, operation: &str) {
    assert!(
        actual >= minimum,
        "{} took {:.3}s, expected >={:.3}s (suspiciously fast)",
        operation,
        actual.as_secs_f64(),
        minimum.as_secs_f64()
    );
}

/// Asserts that `actual` lies within `tolerance` (a fraction) of `expected`
///
/// # Example
///
/// ```
/// use screengrab_test_utils::timing::assert_within;
///
/// assert_within(38.5, 40.0, 0.1, "fps");
/// ```
///
/// # Panics
///
/// Panics if `|actual - expected| > expected * tolerance`.
pub fn assert_within(actual: f64, expected: f64, tolerance: f64, what: &str) {
    let allowed = expected.abs() * tolerance;
    assert!(
        (actual - expected).abs() <= allowed,
        "{} was {:.3}, expected {:.3} ± {:.3}",
        what,
        actual,
        expected,
        allowed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_sync() {
        let (result, duration) = measure_sync("test", || 42);
        assert_eq!(result, 42);
        assert!(duration < Duration::from_secs(1));
    }

    #[test]
    fn test_assert_duration_below_success() {
        assert_duration_below(Duration::from_millis(500), Duration::from_secs(1), "test");
    }

    #[test]
    fn test_assert_duration_above_success() {
        assert_duration_above(Duration::from_millis(1500), Duration::from_secs(1), "test");
    }

    #[test]
    fn test_assert_within_bounds() {
        assert_within(100.0, 100.0, 0.0, "exact");
        assert_within(95.0, 100.0, 0.05, "edge");
    }

    #[test]
    #[should_panic(expected = "fps was")]
    fn test_assert_within_fails_outside() {
        assert_within(80.0, 100.0, 0.1, "fps");
    }
}
