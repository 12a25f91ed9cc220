//! Synthetic capture frames
//!
//! Builds raw 4-byte-per-pixel buffers shaped like what `scrap` and `xcap`
//! hand out, so conversion code can be tested and benchmarked without a
//! display.

use screengrab_core::capture::ImageBuffer;

/// BGRA frame where pixel `(x, y)` is `B = x, G = y, R = x ^ y, A = 0xFF`
/// (all mod 256), with `padding` extra bytes at the end of every row
///
/// Returns the data and its row stride.
pub fn bgra_gradient(width: u32, height: u32, padding: usize) -> (Vec<u8>, usize) {
    let stride = width as usize * 4 + padding;
    let mut data = Vec::with_capacity(stride * height as usize);

    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[x as u8, y as u8, (x ^ y) as u8, 0xFF]);
        }
        data.resize(data.len() + padding, 0xAB);
    }

    (data, stride)
}

/// Same pixels as [`bgra_gradient`] in RGBA layout, tightly packed
pub fn rgba_gradient(width: u32, height: u32) -> Vec<u8> {
    let (mut data, _) = bgra_gradient(width, height, 0);
    for px in data.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    data
}

/// Asserts that `a` and `b` hold the same pixels with first and third
/// channels swapped
///
/// # Panics
///
/// Panics on the first differing pixel, naming its coordinates.
pub fn assert_channels_reversed(a: &ImageBuffer, b: &ImageBuffer) {
    assert_eq!(a.dimensions(), b.dimensions(), "buffers differ in size");

    let (width, height) = a.dimensions();
    for y in 0..height {
        for x in 0..width {
            let [c0, c1, c2] = a.pixel(x, y);
            assert_eq!(
                b.pixel(x, y),
                [c2, c1, c0],
                "pixel ({}, {}) is not channel-reversed",
                x,
                y
            );
        }
    }
}
