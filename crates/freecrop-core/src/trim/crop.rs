//! Integer pixel-rectangle cropping.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left pixel
//! - `x + width` and `y + height` are exclusive

use log::warn;
use serde::{Deserialize, Serialize};

use crate::codec::{Bitmap, BYTES_PER_PIXEL};

/// A rectangle in whole source pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The full extent of `bitmap`.
    pub fn of(bitmap: &Bitmap) -> Self {
        Self::new(0, 0, bitmap.width, bitmap.height)
    }
}

/// Copy the pixels inside `rect` into a new bitmap.
///
/// # Arguments
///
/// * `bitmap` - Source bitmap
/// * `rect` - Region to keep, in source pixels
///
/// # Returns
///
/// A new `Bitmap` containing only the region, with the source's scale and
/// orientation metadata.
///
/// # Behavior
///
/// - A region extending beyond the bitmap is clamped to it
/// - Minimum output dimension is 1x1 pixels
/// - A region covering the whole bitmap returns a copy of the original
/// - An empty bitmap, or one whose buffer is shorter than its dimensions,
///   is returned unchanged
pub fn crop_to_rect(bitmap: &Bitmap, rect: PixelRect) -> Bitmap {
    // Fast path: full crop returns a clone
    if rect == PixelRect::of(bitmap) {
        return bitmap.clone();
    }

    let src_stride = bitmap.stride();
    let buffer_ok = src_stride
        .checked_mul(bitmap.height as usize)
        .is_some_and(|n| bitmap.pixels.len() >= n);
    if bitmap.width == 0 || bitmap.height == 0 || !buffer_ok {
        warn!(
            "Cannot crop {}x{} bitmap with {} bytes",
            bitmap.width,
            bitmap.height,
            bitmap.pixels.len()
        );
        return bitmap.clone();
    }

    let left = rect.x.min(bitmap.width.saturating_sub(1));
    let top = rect.y.min(bitmap.height.saturating_sub(1));
    let right = left.saturating_add(rect.width).min(bitmap.width);
    let bottom = top.saturating_add(rect.height).min(bitmap.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let col_offset = left as usize * BYTES_PER_PIXEL;
    let row_bytes = out_width as usize * BYTES_PER_PIXEL;

    let mut output = Vec::with_capacity(row_bytes * out_height as usize);
    for row in bitmap
        .pixels
        .chunks_exact(src_stride)
        .skip(top as usize)
        .take(out_height as usize)
    {
        output.extend_from_slice(&row[col_offset..col_offset + row_bytes]);
    }

    Bitmap {
        width: out_width,
        height: out_height,
        pixels: output,
        scale: bitmap.scale,
        orientation: bitmap.orientation,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
