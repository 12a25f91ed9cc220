//! Pixel layout conversion
//!
//! Capture libraries hand out 4-channel frames (BGRA for `scrap`, RGBA for
//! `xcap`), often borrowed from memory the library reuses on the next call.
//! These functions read such a frame and write a freshly allocated 3-channel
//! buffer in the requested order. They never write to their input.

use super::ImageBuffer;
use crate::{
    error::{CaptureError, CaptureResult},
    model::{ColorOrder, Region},
};

/// Channel layout of a 4-byte-per-pixel source frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    Bgra,
    Rgba,
}

impl SourceLayout {
    /// Byte offsets of red and blue within a source pixel
    fn red_blue_offsets(self) -> (usize, usize) {
        match self {
            SourceLayout::Bgra => (2, 0),
            SourceLayout::Rgba => (0, 2),
        }
    }
}

/// A borrowed 4-channel frame with an explicit row stride
#[derive(Debug, Clone, Copy)]
pub struct SourceFrame<'a> {
    pub data:   &'a [u8],
    pub width:  u32,
    pub height: u32,
    /// Bytes per row, at least `width * 4`
    pub stride: usize,
    pub layout: SourceLayout,
}

impl<'a> SourceFrame<'a> {
    /// Describes a frame, checking that `data` covers `height` rows of `stride`
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
        layout: SourceLayout,
    ) -> CaptureResult<Self> {
        let min_stride = width as usize * 4;
        if stride < min_stride {
            return Err(CaptureError::Image(format!(
                "row stride {} is shorter than {} pixels",
                stride, width
            )));
        }
        // The last row only needs its pixels, not the full stride
        let needed = match height as usize {
            0 => 0,
            rows => (rows - 1) * stride + min_stride,
        };
        if data.len() < needed {
            return Err(CaptureError::Image(format!(
                "frame has {} bytes, {}x{} with stride {} needs {}",
                data.len(),
                width,
                height,
                stride,
                needed
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            stride,
            layout,
        })
    }

    /// Tightly packed frame (stride = `width * 4`)
    pub fn packed(data: &'a [u8], width: u32, height: u32, layout: SourceLayout) -> CaptureResult<Self> {
        Self::new(data, width, height, width as usize * 4, layout)
    }

    /// The whole frame as a region, if it is not empty
    pub fn full_region(&self) -> Option<Region> {
        Region::from_ltwh(0, 0, self.width, self.height).ok()
    }
}

/// Copies `region` of `frame` into a new 3-channel buffer in `order`
///
/// Alpha is dropped. `region` must lie within the frame; use
/// [`Region::clip_to`] first.
///
/// # Examples
///
/// ```
/// use screengrab_core::{
///     capture::convert::{SourceFrame, SourceLayout, to_three_channel},
///     model::{ColorOrder, Region},
/// };
///
/// // One blue-ish BGRA pixel: B=200, G=100, R=50, A=255
/// let raw = [200u8, 100, 50, 255];
/// let frame = SourceFrame::packed(&raw, 1, 1, SourceLayout::Bgra).unwrap();
/// let region = Region::from_ltwh(0, 0, 1, 1).unwrap();
///
/// let bgr = to_three_channel(&frame, region, ColorOrder::Bgr).unwrap();
/// assert_eq!(bgr.as_bytes(), &[200, 100, 50]);
///
/// let rgb = to_three_channel(&frame, region, ColorOrder::Rgb).unwrap();
/// assert_eq!(rgb.as_bytes(), &[50, 100, 200]);
/// ```
pub fn to_three_channel(
    frame: &SourceFrame<'_>,
    region: Region,
    order: ColorOrder,
) -> CaptureResult<ImageBuffer> {
    if region.right() > frame.width || region.bottom() > frame.height {
        return Err(CaptureError::RegionOutOfBounds {
            region,
            surface_width: frame.width,
            surface_height: frame.height,
        });
    }

    let (red, blue) = frame.layout.red_blue_offsets();
    let (first, third) = match order {
        ColorOrder::Rgb => (red, blue),
        ColorOrder::Bgr => (blue, red),
    };

    let width = region.width() as usize;
    let mut out = Vec::with_capacity(width * region.height() as usize * 3);

    for y in region.top() as usize..region.bottom() as usize {
        let start = y * frame.stride + region.left() as usize * 4;
        let row = &frame.data[start..start + width * 4];
        for px in row.chunks_exact(4) {
            out.extend_from_slice(&[px[first], px[1], px[third]]);
        }
    }

    ImageBuffer::from_raw(region.width(), region.height(), out, order)
}

/// Copies a whole frame into a new 3-channel buffer in `order`
pub fn frame_to_three_channel(frame: &SourceFrame<'_>, order: ColorOrder) -> CaptureResult<ImageBuffer> {
    let region = frame
        .full_region()
        .ok_or_else(|| CaptureError::Image("frame is empty".to_string()))?;
    to_three_channel(frame, region, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x2 BGRA frame where pixel (x, y) has B = x, G = y, R = 10 + x, A = 99,
    /// padded to a 16-byte stride
    fn padded_bgra() -> Vec<u8> {
        let mut data = Vec::new();
        for y in 0..2u8 {
            for x in 0..3u8 {
                data.extend_from_slice(&[x, y, 10 + x, 99]);
            }
            data.extend_from_slice(&[0xEE; 4]);
        }
        data
    }

    #[test]
    fn test_bgra_to_bgr_drops_alpha() {
        let data = padded_bgra();
        let frame = SourceFrame::new(&data, 3, 2, 16, SourceLayout::Bgra).unwrap();
        let out = frame_to_three_channel(&frame, ColorOrder::Bgr).unwrap();

        assert_eq!(out.shape(), (2, 3, 3));
        assert_eq!(out.pixel(0, 0), [0, 0, 10]);
        assert_eq!(out.pixel(2, 1), [2, 1, 12]);
        assert!(!out.as_bytes().contains(&99));
        assert!(!out.as_bytes().contains(&0xEE));
    }

    #[test]
    fn test_bgra_to_rgb_reorders() {
        let data = padded_bgra();
        let frame = SourceFrame::new(&data, 3, 2, 16, SourceLayout::Bgra).unwrap();
        let out = frame_to_three_channel(&frame, ColorOrder::Rgb).unwrap();

        assert_eq!(out.pixel(1, 0), [11, 0, 1]);
        assert_eq!(out.color_order(), ColorOrder::Rgb);
    }

    #[test]
    fn test_rgba_layout() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let frame = SourceFrame::packed(&data, 2, 1, SourceLayout::Rgba).unwrap();

        let rgb = frame_to_three_channel(&frame, ColorOrder::Rgb).unwrap();
        assert_eq!(rgb.as_bytes(), &[1, 2, 3, 5, 6, 7]);

        let bgr = frame_to_three_channel(&frame, ColorOrder::Bgr).unwrap();
        assert_eq!(bgr.as_bytes(), &[3, 2, 1, 7, 6, 5]);
    }

    #[test]
    fn test_sub_region() {
        let data = padded_bgra();
        let frame = SourceFrame::new(&data, 3, 2, 16, SourceLayout::Bgra).unwrap();
        let region = Region::from_ltwh(1, 1, 2, 1).unwrap();
        let out = to_three_channel(&frame, region, ColorOrder::Bgr).unwrap();

        assert_eq!(out.dimensions(), (2, 1));
        assert_eq!(out.as_bytes(), &[1, 1, 11, 2, 1, 12]);
    }

    #[test]
    fn test_region_outside_frame() {
        let data = padded_bgra();
        let frame = SourceFrame::new(&data, 3, 2, 16, SourceLayout::Bgra).unwrap();
        let region = Region::from_ltwh(2, 0, 2, 1).unwrap();

        let err = to_three_channel(&frame, region, ColorOrder::Bgr).unwrap_err();
        assert!(matches!(err, CaptureError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_source_frame_validation() {
        let data = [0u8; 16];
        assert!(SourceFrame::new(&data, 2, 2, 7, SourceLayout::Bgra).is_err());
        assert!(SourceFrame::new(&data, 2, 3, 8, SourceLayout::Bgra).is_err());
        assert!(SourceFrame::packed(&data, 2, 2, SourceLayout::Bgra).is_ok());
    }

    #[test]
    fn test_conversion_leaves_source_untouched() {
        let data = padded_bgra();
        let snapshot = data.clone();
        let frame = SourceFrame::new(&data, 3, 2, 16, SourceLayout::Bgra).unwrap();
        let _ = frame_to_three_channel(&frame, ColorOrder::Rgb).unwrap();

        assert_eq!(data, snapshot);
    }
}
