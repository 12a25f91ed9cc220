//! screengrab-core: Pluggable screen-region capture library
//!
//! This library captures a rectangle of the screen into a caller-owned
//! 3-channel image buffer using one of two interchangeable backends (`scrap`
//! and `xcap`), and provides a benchmark harness that measures how many
//! frames per second each backend can deliver.

pub mod capture;
pub mod config;
pub mod error;
pub mod model;
pub mod perf;
pub mod util;
