//! Transparent-border trimming WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { trim_transparent, opaque_insets } from '@freecrop/wasm';
//!
//! const [top, left, bottom, right] = opaque_insets(bitmap, false);
//! const trimmed = trim_transparent(bitmap, false);
//! ```

use freecrop_core::trim::{self, AlphaThreshold, PixelInsets};
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsBitmap};

/// Remove every transparent border row and column from `image`.
///
/// # Arguments
///
/// * `image` - Bitmap to trim
/// * `fully_opaque_only` - When true only alpha 255 counts as visible;
///   otherwise any non-zero alpha does
///
/// A fully transparent image comes back unchanged.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions.
#[wasm_bindgen]
pub fn trim_transparent(image: &JsBitmap, fully_opaque_only: bool) -> Result<JsBitmap, JsValue> {
    let bitmap = image.to_bitmap().map_err(js_error)?;
    let trimmed = trim::trim_transparent(&bitmap, threshold(fully_opaque_only));
    Ok(JsBitmap::from_bitmap(trimmed))
}

/// Margins between the edges of `image` and its visible content, as
/// `[top, left, bottom, right]`.
#[wasm_bindgen]
pub fn opaque_insets(image: &JsBitmap, fully_opaque_only: bool) -> Result<Vec<u32>, JsValue> {
    let bitmap = image.to_bitmap().map_err(js_error)?;
    let insets = trim::opaque_bounding_box(&bitmap, threshold(fully_opaque_only));
    Ok(insets_to_vec(insets))
}

fn threshold(fully_opaque_only: bool) -> AlphaThreshold {
    if fully_opaque_only {
        AlphaThreshold::FullyOpaqueOnly
    } else {
        AlphaThreshold::AnyNonZero
    }
}

fn insets_to_vec(insets: PixelInsets) -> Vec<u32> {
    vec![insets.top, insets.left, insets.bottom, insets.right]
}
