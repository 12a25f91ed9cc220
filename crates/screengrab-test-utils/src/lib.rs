//! Test utilities for screengrab integration tests
//!
//! Shared helpers for the `screengrab-core` test suites and benchmarks.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! screengrab-test-utils = { path = "../screengrab-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`timing`]: Timing assertions, plus re-exports of `screengrab_core::perf`
//! - [`frames`]: Synthetic 4-channel source frames and pixel assertions
//!
//! ```
//! use std::time::Duration;
//!
//! use screengrab_test_utils::timing::{assert_duration_below, measure_sync};
//!
//! let (sum, duration) = measure_sync("sum", || (1..=100u32).sum::<u32>());
//! assert_eq!(sum, 5050);
//! assert_duration_below(duration, Duration::from_secs(5), "sum");
//! ```

pub mod frames;
pub mod timing;
