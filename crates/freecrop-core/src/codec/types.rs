//! Core bitmap types shared by the trimmer, masker and codecs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Errors raised when constructing a [`Bitmap`] from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    /// Pixel buffer length doesn't match the dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors from decoding or encoding image files.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bytes could not be decoded as a supported image format.
    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    /// The bitmap handed to the encoder is malformed.
    #[error(transparent)]
    Bitmap(#[from] BitmapError),
}

/// EXIF orientation values (1-8).
///
/// Carried as metadata only; the pixel buffer is never reoriented by this
/// crate. Trimming and cropping preserve it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90CW = 6,
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if displaying with this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// A decoded image with straight (non-premultiplied) RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
    /// Display scale (device pixels per point).
    pub scale: f64,
    /// Orientation metadata.
    pub orientation: Orientation,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    ///
    /// Scale defaults to 1.0 and orientation to [`Orientation::Normal`].
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
            scale: 1.0,
            orientation: Orientation::Normal,
        }
    }

    /// Validating constructor for buffers coming from outside the crate.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(BitmapError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self::new(width, height, pixels))
    }

    /// A fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::new(
            width,
            height,
            vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL],
        )
    }

    /// Create a Bitmap from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage` for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Alpha of the pixel at `(x, y)`, or `None` outside the bitmap.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y as usize * self.stride() + x as usize * BYTES_PER_PIXEL + 3;
        self.pixels.get(idx).copied()
    }

    /// Width and height after applying the orientation metadata.
    pub fn oriented_dimensions(&self) -> (u32, u32) {
        if self.orientation.swaps_dimensions() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitmap_creation() {
        let bmp = Bitmap::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(bmp.width, 100);
        assert_eq!(bmp.height, 50);
        assert_eq!(bmp.pixel_count(), 5000);
        assert_eq!(bmp.stride(), 400);
        assert_eq!(bmp.scale, 1.0);
        assert!(!bmp.is_empty());
    }

    #[test]
    fn test_bitmap_empty() {
        let bmp = Bitmap::new(0, 0, vec![]);
        assert!(bmp.is_empty());
    }

    #[test]
    fn test_from_rgba_validates() {
        assert_eq!(
            Bitmap::from_rgba(2, 2, vec![0u8; 15]).unwrap_err(),
            BitmapError::SizeMismatch {
                expected: 16,
                actual: 15
            }
        );
        assert_eq!(
            Bitmap::from_rgba(0, 2, vec![]).unwrap_err(),
            BitmapError::InvalidDimensions {
                width: 0,
                height: 2
            }
        );
        assert!(Bitmap::from_rgba(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_alpha_at() {
        let mut bmp = Bitmap::transparent(3, 2);
        let idx = bmp.stride() + 2 * 4 + 3;
        bmp.pixels[idx] = 200;

        assert_eq!(bmp.alpha_at(2, 1), Some(200));
        assert_eq!(bmp.alpha_at(0, 0), Some(0));
        assert_eq!(bmp.alpha_at(3, 0), None);
        assert_eq!(bmp.alpha_at(0, 2), None);
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_oriented_dimensions() {
        let bmp = Bitmap::transparent(60, 40);
        assert_eq!(bmp.oriented_dimensions(), (60, 40));

        let bmp = bmp.with_orientation(Orientation::Rotate90CW);
        assert_eq!(bmp.oriented_dimensions(), (40, 60));
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let bmp = Bitmap::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        let img = bmp.to_rgba_image().unwrap();
        assert_eq!(img.get_pixel(1, 0).0, [5, 6, 7, 8]);
        assert_eq!(Bitmap::from_rgba_image(img), bmp);
    }

    #[test]
    fn test_error_display() {
        let err = BitmapError::InvalidDimensions {
            width: 0,
            height: 5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid dimensions: width (0) and height (5) must be non-zero"
        );
    }
}
