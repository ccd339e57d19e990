//! PNG encoding for cropped output.
//!
//! PNG is used because the output of a free-form crop carries an alpha mask
//! that JPEG cannot represent.

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use std::io::Cursor;

use super::{Bitmap, BitmapError, CodecError, BYTES_PER_PIXEL};

/// Encode an RGBA bitmap to PNG bytes.
///
/// # Errors
///
/// Returns `CodecError::Bitmap` for zero dimensions or a pixel buffer whose
/// length doesn't match them, and `CodecError::EncodingFailed` if the
/// encoder itself fails.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, CodecError> {
    let (width, height) = (bitmap.width, bitmap.height);
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidDimensions { width, height }.into());
    }

    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if bitmap.pixels.len() != expected {
        return Err(BitmapError::SizeMismatch {
            expected,
            actual: bitmap.pixels.len(),
        }
        .into());
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&bitmap.pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| CodecError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
