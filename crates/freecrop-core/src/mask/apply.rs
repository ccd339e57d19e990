//! Contour mask application
//!
//! Clears every pixel whose centre lies outside a closed contour, using an
//! even-odd scanline fill.

use crate::codec::{Bitmap, BYTES_PER_PIXEL};
use crate::geometry::PathContour;

/// Make every pixel outside `contour` fully transparent, in place.
///
/// The contour is given in the bitmap's pixel coordinates and is treated as
/// implicitly closed. A pixel is inside when its centre `(x + 0.5, y + 0.5)`
/// is inside under the even-odd rule. Cleared pixels become `[0, 0, 0, 0]`.
///
/// # Arguments
/// * `bitmap` - RGBA bitmap to mask
/// * `contour` - Selection boundary in pixel coordinates
///
/// # Algorithm
/// For each row:
/// 1. Intersect the horizontal line through the pixel centres with every
///    edge, using a half-open rule on edge endpoints so shared vertices are
///    counted once
/// 2. Sort the crossings; consecutive pairs delimit inside spans
/// 3. Clear the pixels between spans
///
/// # Performance
/// - One crossing buffer reused across rows
/// - O(height × edges + pixels)
pub fn apply_contour_mask(bitmap: &mut Bitmap, contour: &PathContour) {
    let stride = bitmap.stride();
    if stride == 0 {
        return;
    }

    let vertices = contour.points();
    let width = bitmap.width as usize;
    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());

    for (row, line) in bitmap.pixels.chunks_exact_mut(stride).enumerate() {
        let yc = row as f64 + 0.5;

        crossings.clear();
        if vertices.len() >= 3 {
            let mut j = vertices.len() - 1;
            for i in 0..vertices.len() {
                let (a, b) = (vertices[j], vertices[i]);
                if (a.y <= yc) != (b.y <= yc) {
                    crossings.push(a.x + (yc - a.y) * (b.x - a.x) / (b.y - a.y));
                }
                j = i;
            }
        }
        crossings.sort_unstable_by(f64::total_cmp);

        // Columns [cursor, start) are outside; [start, end) inside.
        let mut cursor = 0usize;
        for span in crossings.chunks_exact(2) {
            let start = first_column_at_or_after(span[0], width);
            let end = first_column_at_or_after(span[1], width);
            if start > cursor {
                clear_columns(line, cursor, start);
            }
            cursor = cursor.max(end);
        }
        if cursor < width {
            clear_columns(line, cursor, width);
        }
    }
}

/// Return a masked copy of `bitmap`.
pub fn masked(bitmap: &Bitmap, contour: &PathContour) -> Bitmap {
    let mut out = bitmap.clone();
    apply_contour_mask(&mut out, contour);
    out
}

/// First column whose centre is at or right of `x`, clamped to `[0, width]`.
#[inline]
fn first_column_at_or_after(x: f64, width: usize) -> usize {
    let col = (x - 0.5).ceil();
    if col <= 0.0 {
        0
    } else if col >= width as f64 {
        width
    } else {
        col as usize
    }
}

#[inline]
fn clear_columns(line: &mut [u8], from: usize, to: usize) {
    line[from * BYTES_PER_PIXEL..to * BYTES_PER_PIXEL].fill(0);
}
