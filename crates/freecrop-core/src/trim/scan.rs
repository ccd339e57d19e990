//! Alpha-channel scan for the tight bounding box of visible pixels.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec::{Bitmap, BYTES_PER_PIXEL};

/// Which alpha values count as "visible" when scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlphaThreshold {
    /// Only alpha == 255.
    FullyOpaqueOnly,
    /// Any alpha > 0.
    #[default]
    AnyNonZero,
}

impl AlphaThreshold {
    #[inline]
    pub fn passes(self, alpha: u8) -> bool {
        match self {
            AlphaThreshold::FullyOpaqueOnly => alpha == u8::MAX,
            AlphaThreshold::AnyNonZero => alpha > 0,
        }
    }
}

/// Margins in whole pixels between a bitmap's edges and its content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelInsets {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

impl PixelInsets {
    pub const ZERO: PixelInsets = PixelInsets {
        top: 0,
        left: 0,
        bottom: 0,
        right: 0,
    };

    pub fn new(top: u32, left: u32, bottom: u32, right: u32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// Compute the insets from each edge of `bitmap` to the smallest rectangle
/// containing every pixel whose alpha passes `threshold`.
///
/// The buffer is walked once, row by row, with an explicit stride. Within a
/// row only the first and last passing column matter, so each row is
/// searched from both ends.
///
/// A bitmap with no passing pixel (fully transparent, or empty) yields
/// [`PixelInsets::ZERO`]: it is treated as already tight rather than as an
/// error.
///
/// # Example
///
/// A 10x10 canvas whose only opaque pixel is `(2, 3)` gives
/// `{ top: 3, left: 2, bottom: 6, right: 7 }`.
pub fn opaque_bounding_box(bitmap: &Bitmap, threshold: AlphaThreshold) -> PixelInsets {
    let stride = bitmap.stride();
    if stride == 0 || bitmap.height == 0 {
        return PixelInsets::ZERO;
    }

    let mut min_row = usize::MAX;
    let mut max_row = 0usize;
    let mut min_col = usize::MAX;
    let mut max_col = 0usize;

    for (row, line) in bitmap
        .pixels
        .chunks_exact(stride)
        .take(bitmap.height as usize)
        .enumerate()
    {
        let passes = |px: &[u8]| threshold.passes(px[3]);

        let Some(first) = line.chunks_exact(BYTES_PER_PIXEL).position(passes) else {
            continue;
        };
        // `first` passed, so a last passing column exists.
        let last = line
            .chunks_exact(BYTES_PER_PIXEL)
            .rposition(passes)
            .unwrap_or(first);

        min_row = min_row.min(row);
        max_row = row;
        min_col = min_col.min(first);
        max_col = max_col.max(last);
    }

    if min_row == usize::MAX {
        debug!(
            "No visible pixels in {}x{} bitmap; treating as tight",
            bitmap.width, bitmap.height
        );
        return PixelInsets::ZERO;
    }

    let width = bitmap.width as usize;
    let height = bitmap.height as usize;
    PixelInsets {
        top: min_row as u32,
        left: min_col as u32,
        bottom: (height - max_row - 1) as u32,
        right: (width - max_col - 1) as u32,
    }
}
