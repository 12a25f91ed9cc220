//! Mock capture backend for testing
//!
//! `MockBackend` implements [`CaptureBackend`] without touching the OS. Each
//! grab returns a freshly allocated test-pattern frame, so benchmark and
//! conversion logic can be exercised on headless machines.
//!
//! # Features
//!
//! - **Synthetic frames:** [`ImageBuffer::from_test_pattern`] at a fixed size
//! - **Configurable delay:** Sleep inside every grab to simulate capture cost
//! - **Error injection:** Fail on a chosen call to test error propagation
//! - **Call counting:** Observe how many grabs a caller performed
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use screengrab_core::{
//!     capture::{CaptureBackend, MockBackend},
//!     model::ColorOrder,
//! };
//!
//! let mut backend = MockBackend::new(64, 48, ColorOrder::Bgr)
//!     .with_delay(Duration::from_millis(1))
//!     .fail_on_call(3);
//!
//! assert!(backend.grab().is_ok());
//! assert!(backend.grab().is_ok());
//! assert!(backend.grab().is_err());
//! assert_eq!(backend.calls(), 3);
//! ```

use std::{thread, time::Duration};

use super::{CaptureBackend, ImageBuffer};
use crate::{
    error::{CaptureError, CaptureResult},
    model::ColorOrder,
};

/// Synthetic backend for tests and demos
#[derive(Debug, Clone)]
pub struct MockBackend {
    width:        u32,
    height:       u32,
    order:        ColorOrder,
    /// Sleep performed inside every grab
    delay:        Option<Duration>,
    /// 1-based call number that fails
    fail_on_call: Option<u64>,
    calls:        u64,
}

impl MockBackend {
    /// Creates a backend producing `width` x `height` frames in `order`
    pub fn new(width: u32, height: u32, order: ColorOrder) -> Self {
        Self {
            width,
            height,
            order,
            delay: None,
            fail_on_call: None,
            calls: 0,
        }
    }

    /// Sleeps for `delay` inside every grab
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Makes the `call`-th grab (1-based) return [`CaptureError::CaptureFailed`]
    pub fn fail_on_call(mut self, call: u64) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Number of grabs attempted so far, failed ones included
    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl CaptureBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn grab(&mut self) -> CaptureResult<ImageBuffer> {
        self.calls += 1;

        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        if self.fail_on_call == Some(self.calls) {
            return Err(CaptureError::capture_failed(
                "mock",
                format!("injected failure on call {}", self.calls),
            ));
        }

        Ok(ImageBuffer::from_test_pattern(self.width, self.height, self.order))
    }
}
