//! Image buffer wrapper for captured frames
//!
//! This module provides an `ImageBuffer` wrapper around `image::RgbImage`
//! tagged with the [`ColorOrder`] its samples are stored in. Every buffer is
//! a dense H×W×3 array of `u8`, row-major, top-to-bottom, left-to-right.
//!
//! # Examples
//!
//! ```
//! use screengrab_core::{capture::ImageBuffer, model::ColorOrder};
//!
//! // Create a test pattern
//! let img = ImageBuffer::from_test_pattern(1920, 1080, ColorOrder::Rgb);
//! assert_eq!(img.shape(), (1080, 1920, 3));
//!
//! // Scale down to 50% for a preview
//! let preview = img.scale(0.5).unwrap();
//! assert_eq!(preview.dimensions(), (960, 540));
//!
//! // Same pixels, other channel order
//! let bgr = img.to_color_order(ColorOrder::Bgr);
//! assert_eq!(bgr.pixel(0, 0), {
//!     let [r, g, b] = img.pixel(0, 0);
//!     [b, g, r]
//! });
//! ```

use image::RgbImage;

use crate::{
    error::{CaptureError, CaptureResult},
    model::ColorOrder,
};

/// Owned 3-channel frame in a known channel order
///
/// The samples of `inner` are laid out in `order`; for [`ColorOrder::Bgr`] the
/// `image::Rgb` pixel type holds blue in its first slot. Use
/// [`to_rgb_image`](ImageBuffer::to_rgb_image) before handing the data to
/// anything that assumes RGB.
///
/// All transformation methods return new `ImageBuffer` instances, leaving
/// the original unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    inner: RgbImage,
    order: ColorOrder,
}

impl ImageBuffer {
    /// Wraps an existing image whose samples are in `order`
    pub fn new(inner: RgbImage, order: ColorOrder) -> Self {
        Self { inner, order }
    }

    /// Builds a buffer from raw `width * height * 3` samples
    ///
    /// # Errors
    ///
    /// [`CaptureError::Image`] when the sample count does not match the
    /// dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>, order: ColorOrder) -> CaptureResult<Self> {
        let len = data.len();
        let inner = RgbImage::from_raw(width, height, data).ok_or_else(|| {
            CaptureError::Image(format!(
                "{} samples do not fill a {}x{}x3 buffer",
                len, width, height
            ))
        })?;
        Ok(Self::new(inner, order))
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Returns the array shape as `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height() as usize, self.width() as usize, 3)
    }

    /// Channel order of the stored samples
    pub fn color_order(&self) -> ColorOrder {
        self.order
    }

    /// Samples of the pixel at `(x, y)`, in the buffer's channel order
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.inner.get_pixel(x, y).0
    }

    /// Raw samples, row-major
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Consumes the buffer and returns its raw samples
    pub fn into_raw(self) -> Vec<u8> {
        self.inner.into_raw()
    }

    /// Returns a copy with the first and third channel of every pixel swapped
    pub fn reverse_channels(&self) -> Self {
        let mut inner = self.inner.clone();
        for px in inner.pixels_mut() {
            px.0.swap(0, 2);
        }
        Self::new(inner, self.order.reversed())
    }

    /// Returns a copy in the requested channel order
    ///
    /// Always allocates, even when the order already matches.
    pub fn to_color_order(&self, order: ColorOrder) -> Self {
        if order == self.order {
            self.clone()
        } else {
            self.reverse_channels()
        }
    }

    /// Returns an `image::RgbImage` with samples in true RGB order
    pub fn to_rgb_image(&self) -> RgbImage {
        self.to_color_order(ColorOrder::Rgb).inner
    }

    /// Scales the image by the given factor
    ///
    /// Uses triangle filtering, which is fast enough for per-frame previews.
    /// The scale factor is clamped to `0.1..=2.0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use screengrab_core::{capture::ImageBuffer, model::ColorOrder};
    ///
    /// let img = ImageBuffer::from_test_pattern(1920, 1080, ColorOrder::Bgr);
    ///
    /// let half = img.scale(0.5).unwrap();
    /// assert_eq!(half.dimensions(), (960, 540));
    /// assert_eq!(half.color_order(), ColorOrder::Bgr);
    /// ```
    pub fn scale(&self, factor: f32) -> CaptureResult<Self> {
        let factor = factor.clamp(0.1, 2.0);

        let (width, height) = self.dimensions();
        let new_width = ((width as f32) * factor) as u32;
        let new_height = ((height as f32) * factor) as u32;

        // Short-circuit if dimensions are unchanged
        if new_width == width && new_height == height {
            return Ok(self.clone());
        }

        // Ensure dimensions are at least 1x1
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);

        let scaled = image::imageops::resize(
            &self.inner,
            new_width,
            new_height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Self::new(scaled, self.order))
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// The pattern is a vertical gradient from blue (top) to cyan (bottom)
    /// with red increasing left to right, stored in `order`.
    pub fn from_test_pattern(width: u32, height: u32, order: ColorOrder) -> Self {
        let img = RgbImage::from_fn(width, height, |x, y| {
            let red = (x as f32 / width.max(1) as f32 * 255.0) as u8;
            let green = (y as f32 / height.max(1) as f32 * 255.0) as u8;
            image::Rgb([red, green, 255])
        });

        Self::new(img, ColorOrder::Rgb).to_color_order(order)
    }

    /// Returns a reference to the inner image
    pub fn inner(&self) -> &RgbImage {
        &self.inner
    }
}
