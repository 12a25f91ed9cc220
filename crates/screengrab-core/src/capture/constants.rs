//! Centralized timing and configuration constants for screen capture.
//!
//! # Runtime Configuration
//!
//! Timeout values can be overridden at runtime via environment variables:
//!
//! | Environment Variable | Default | Description |
//! |---------------------|---------|-------------|
//! | `SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS` | 2000 | How long scrap is polled for a ready frame |
//! | `SCREENGRAB_SCRAP_POLL_INTERVAL_MS` | 1 | Sleep between scrap polls |
//!
//! There is no timeout around the OS capture calls themselves;
//! only scrap's wait for its first ready frame is bounded.

/// Default benchmark run length, in seconds.
pub const DEFAULT_BENCH_DURATION_SECS: f64 = 10.0;

/// Default preview downscale factor handed to a frame preview.
pub const DEFAULT_PREVIEW_SCALE: f32 = 0.5;

/// Region benchmarked when nothing else is configured.
pub const DEFAULT_BENCH_REGION: (u32, u32, u32, u32) = (0, 0, 1920, 1080);

/// How long the scrap backend polls for its first frame before giving up.
///
/// On Windows, DXGI desktop duplication reports `WouldBlock` until the
/// desktop changes, so a static screen can delay the first frame. Later
/// grabs reuse the previous frame instead of waiting.
pub const SCRAP_FRAME_TIMEOUT_MS: u64 = 2000;

/// Sleep between scrap polls while a frame is not ready.
pub const SCRAP_POLL_INTERVAL_MS: u64 = 1;

// =============================================================================
// Environment Variable Overrides
// =============================================================================

/// Helper to get a value from an environment variable or fall back to default.
fn get_from_env(env_var: &str, default: u64) -> u64 {
    std::env::var(env_var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Get the scrap frame timeout, checking environment variable override.
///
/// Override with: `SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS`
pub fn scrap_frame_timeout_ms() -> u64 {
    get_from_env("SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS", SCRAP_FRAME_TIMEOUT_MS)
}

/// Get the scrap poll interval, checking environment variable override.
///
/// Override with: `SCREENGRAB_SCRAP_POLL_INTERVAL_MS`
pub fn scrap_poll_interval_ms() -> u64 {
    get_from_env("SCREENGRAB_SCRAP_POLL_INTERVAL_MS", SCRAP_POLL_INTERVAL_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(
            ["SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS", "SCREENGRAB_SCRAP_POLL_INTERVAL_MS"],
            || {
                assert_eq!(scrap_frame_timeout_ms(), SCRAP_FRAME_TIMEOUT_MS);
                assert_eq!(scrap_poll_interval_ms(), SCRAP_POLL_INTERVAL_MS);
            },
        );
    }

    #[test]
    fn test_env_override() {
        temp_env::with_var("SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS", Some("5000"), || {
            assert_eq!(scrap_frame_timeout_ms(), 5000);
        });
    }

    #[test]
    fn test_invalid_env_falls_back() {
        temp_env::with_var("SCREENGRAB_SCRAP_FRAME_TIMEOUT_MS", Some("soon"), || {
            assert_eq!(scrap_frame_timeout_ms(), SCRAP_FRAME_TIMEOUT_MS);
        });
    }
}
