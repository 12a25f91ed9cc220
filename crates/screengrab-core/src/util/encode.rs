//! PNG encoding for captured frames
//!
//! Frames may be stored in BGR order; everything here normalises to true RGB
//! before encoding, so files written from either colour order look the same.
//!
//! # Examples
//!
//! ```
//! use screengrab_core::{capture::ImageBuffer, model::ColorOrder, util::encode::encode_png};
//!
//! let img = ImageBuffer::from_test_pattern(320, 240, ColorOrder::Bgr);
//! let png_bytes = encode_png(&img).unwrap();
//! assert!(png_bytes.starts_with(b"\x89PNG"));
//! ```

use std::{fs, io::Cursor, path::Path};

use image::{
    ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};
use tracing::debug;

use crate::{
    capture::ImageBuffer,
    error::{CaptureError, CaptureResult},
};

/// Encodes an image as PNG with default compression
pub fn encode_png(buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    encode_png_with_compression(buffer, CompressionType::Default)
}

/// Encodes an image as PNG with the given compression level
///
/// Previews written every few frames use [`CompressionType::Fast`] to keep
/// encoding out of the way of the capture loop.
pub fn encode_png_with_compression(
    buffer: &ImageBuffer,
    compression: CompressionType,
) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();

    // Use adaptive filter for automatic per-scanline optimization
    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let rgb = buffer.to_rgb_image();
    let (width, height) = rgb.dimensions();

    encoder
        .write_image(rgb.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| CaptureError::Image(format!("png encoding failed: {}", e)))?;

    Ok(output)
}

/// Encodes `buffer` and writes it to `path`, returning the byte count
pub fn write_png(buffer: &ImageBuffer, path: &Path) -> CaptureResult<usize> {
    write_png_with_compression(buffer, path, CompressionType::Default)
}

/// [`write_png`] with an explicit compression level
pub fn write_png_with_compression(
    buffer: &ImageBuffer,
    path: &Path,
    compression: CompressionType,
) -> CaptureResult<usize> {
    let bytes = encode_png_with_compression(buffer, compression)?;
    fs::write(path, &bytes)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorOrder;

    #[test]
    fn test_bgr_and_rgb_encode_identically() {
        let rgb = ImageBuffer::from_test_pattern(64, 32, ColorOrder::Rgb);
        let bgr = ImageBuffer::from_test_pattern(64, 32, ColorOrder::Bgr);

        assert_eq!(encode_png(&rgb).unwrap(), encode_png(&bgr).unwrap());
    }

    #[test]
    fn test_write_png_round_trips_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let img = ImageBuffer::from_raw(2, 1, vec![10, 20, 30, 40, 50, 60], ColorOrder::Bgr)
            .unwrap();

        let written = write_png(&img, &path).unwrap();
        assert_eq!(written as u64, fs::metadata(&path).unwrap().len());

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.get_pixel(0, 0).0, [30, 20, 10]);
        assert_eq!(decoded.get_pixel(1, 0).0, [60, 50, 40]);
    }

    #[test]
    fn test_write_png_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let img = ImageBuffer::from_test_pattern(4, 4, ColorOrder::Rgb);

        assert!(matches!(write_png(&img, &path), Err(CaptureError::Io(_))));
    }
}
