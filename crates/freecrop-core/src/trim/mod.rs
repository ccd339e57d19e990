//! Trimming transparent margins from bitmaps.
//!
//! This module provides:
//! - [`opaque_bounding_box`], a single-pass alpha scan returning [`PixelInsets`]
//! - [`trim`], which crops a bitmap by a set of insets
//! - [`trim_transparent`], the two combined
//! - [`crop_to_rect`], the row-copy primitive both the trimmer and crop
//!   finalization use
//!
//! # Example
//!
//! ```ignore
//! use freecrop_core::trim::{trim_transparent, AlphaThreshold};
//!
//! let tight = trim_transparent(&masked, AlphaThreshold::AnyNonZero);
//! ```

mod crop;
mod scan;

pub use crop::{crop_to_rect, PixelRect};
pub use scan::{opaque_bounding_box, AlphaThreshold, PixelInsets};

use crate::codec::Bitmap;

/// Crop `bitmap` by `insets`, keeping scale and orientation metadata.
///
/// Zero insets return an unchanged copy of the input. Insets that would
/// consume the whole bitmap are clamped so at least one pixel remains.
pub fn trim(bitmap: &Bitmap, insets: PixelInsets) -> Bitmap {
    if insets.is_zero() {
        return bitmap.clone();
    }

    let x = insets.left.min(bitmap.width.saturating_sub(1));
    let y = insets.top.min(bitmap.height.saturating_sub(1));
    let width = bitmap
        .width
        .saturating_sub(x)
        .saturating_sub(insets.right)
        .max(1);
    let height = bitmap
        .height
        .saturating_sub(y)
        .saturating_sub(insets.bottom)
        .max(1);

    crop_to_rect(bitmap, PixelRect::new(x, y, width, height))
}

/// Remove every fully transparent border row and column.
///
/// See [`opaque_bounding_box`] for how `threshold` and fully transparent
/// input are handled.
pub fn trim_transparent(bitmap: &Bitmap, threshold: AlphaThreshold) -> Bitmap {
    trim(bitmap, opaque_bounding_box(bitmap, threshold))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
