//! Decoding encoded image files into RGBA bitmaps.

use std::io::Cursor;

use image::ImageReader;
use log::debug;

use super::{Bitmap, CodecError};

/// Decode an encoded image (PNG or JPEG) into an RGBA bitmap.
///
/// The format is guessed from the leading bytes. Images without an alpha
/// channel come back fully opaque.
///
/// # Errors
///
/// Returns `CodecError::DecodeFailed` if the format is unknown or the data
/// is corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, CodecError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CodecError::DecodeFailed(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| CodecError::DecodeFailed(e.to_string()))?;

    let bitmap = Bitmap::from_rgba_image(img.into_rgba8());
    debug!("Decoded {}x{} bitmap", bitmap.width, bitmap.height);
    Ok(bitmap)
}
