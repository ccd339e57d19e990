//! Selection masks for crop output
//!
//! A finished selection is a closed [`PathContour`](crate::geometry::PathContour).
//! Masking keeps the pixels inside it and makes everything else transparent,
//! so the trimmer can then cut the bitmap down to the selection's extent.
//!
//! ## Fill Rule
//!
//! Even-odd, sampled at pixel centres. Self-touching lasso contours therefore
//! behave like [`PathContour::contains`](crate::geometry::PathContour::contains).

mod apply;

pub use apply::{apply_contour_mask, masked};
