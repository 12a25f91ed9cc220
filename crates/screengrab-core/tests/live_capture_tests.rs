//! Live capture tests
//!
//! These grab real frames and need a desktop session; they are ignored by
//! default.
//!
//! ```bash
//! cargo test -p screengrab-core --test live_capture_tests -- --ignored
//!
//! # Headless Linux
//! xvfb-run -a cargo test -p screengrab-core --test live_capture_tests -- --ignored
//! ```

use std::time::Duration;

use screengrab_core::{
    capture::{CaptureBackend, check_backend, create_backend, grab_once, take_screenshot},
    model::{BackendKind, CaptureArea, ColorOrder, Region},
    perf::Benchmark,
};
use screengrab_test_utils::{frames::assert_channels_reversed, timing::measure_sync};

fn small_region() -> Region {
    Region::from_ltwh(0, 0, 200, 100).unwrap()
}

#[test]
#[ignore = "Requires a live display"]
fn region_grab_has_requested_shape() {
    for kind in BackendKind::ALL {
        check_backend(kind).unwrap();

        let (frame, _) = measure_sync(kind.as_str(), || {
            take_screenshot(Some(small_region()), "BGR", kind.as_str())
        });
        assert_eq!(frame.unwrap().shape(), (100, 200, 3), "{kind}");
    }
}

#[test]
#[ignore = "Requires a live display"]
fn live_grabs_do_not_alias() {
    for kind in BackendKind::ALL {
        let mut backend = create_backend(kind, small_region().into(), ColorOrder::Rgb).unwrap();
        let first = backend.grab().unwrap();
        let first_ptr = first.as_bytes().as_ptr();
        let second = backend.grab().unwrap();

        assert_ne!(first_ptr, second.as_bytes().as_ptr(), "{kind}");
    }
}

#[test]
#[ignore = "Requires a static screen"]
fn rgb_and_bgr_grabs_are_channel_reversed() {
    for kind in BackendKind::ALL {
        let area = CaptureArea::from(small_region());
        let rgb = grab_once(area, ColorOrder::Rgb, kind).unwrap();
        let bgr = grab_once(area, ColorOrder::Bgr, kind).unwrap();

        assert_channels_reversed(&rgb, &bgr);
    }
}

#[test]
#[ignore = "Requires a live display"]
fn full_screen_grab_is_non_empty() {
    for kind in BackendKind::ALL {
        let frame = grab_once(CaptureArea::FullScreen, ColorOrder::Bgr, kind).unwrap();
        let (height, width, channels) = frame.shape();

        assert!(height > 0 && width > 0, "{kind}");
        assert_eq!(channels, 3);
    }
}

#[test]
#[ignore = "Requires a live display"]
fn short_live_benchmark() {
    for kind in BackendKind::ALL {
        let mut backend = create_backend(kind, small_region().into(), ColorOrder::Bgr).unwrap();
        let result = Benchmark::new(Duration::from_millis(500)).run(&mut backend).unwrap();

        assert_eq!(result.backend_name, kind.as_str());
        assert!(result.frame_count > 0, "{kind}");
        assert!(result.average_fps > 0.0, "{kind}");
    }
}
