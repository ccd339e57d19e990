//! Image decoding and encoding WASM bindings.
//!
//! Sources arrive as encoded files and cropped results leave as PNG, the
//! only supported output format that keeps the selection's alpha mask.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_png } from '@freecrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const source = decode_image(bytes);
//! // ... run a selection session ...
//! const png = encode_png(cropped);
//! ```

use freecrop_core::codec;
use wasm_bindgen::prelude::*;

use crate::types::{js_error, JsBitmap};

/// Decode PNG or JPEG bytes into an RGBA bitmap.
///
/// # Errors
///
/// Returns an error if the format is not recognized or the data is
/// corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    codec::decode_image(bytes)
        .map(JsBitmap::from_bitmap)
        .map_err(js_error)
}

/// Encode a bitmap to PNG bytes.
///
/// # Errors
///
/// Returns an error if the bitmap has a zero dimension or its pixel buffer
/// doesn't match its size.
#[wasm_bindgen]
pub fn encode_png(image: &JsBitmap) -> Result<Vec<u8>, JsValue> {
    let bitmap = image.to_bitmap().map_err(js_error)?;
    codec::encode_png(&bitmap).map_err(js_error)
}
