//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core FreeCrop
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use freecrop_core::codec::{Bitmap, BitmapError};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`. For large images keep the
/// bitmap in WASM memory and only extract pixels when needed.
///
/// The `free()` method can be called to explicitly release WASM memory, but
/// this is optional as wasm-bindgen's finalizer will handle cleanup
/// automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    scale: f64,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - Straight RGBA pixel data (4 bytes per pixel, row-major order)
    ///
    /// The buffer is validated when the bitmap is first used.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
            scale: 1.0,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Device pixels per layout unit
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[wasm_bindgen(setter)]
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsBitmap {
    /// Wrap a core bitmap, keeping its scale.
    pub(crate) fn from_bitmap(bitmap: Bitmap) -> Self {
        Self {
            width: bitmap.width,
            height: bitmap.height,
            scale: bitmap.scale,
            pixels: bitmap.pixels,
        }
    }

    /// Validate and convert to a core bitmap.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Result<Bitmap, BitmapError> {
        Bitmap::from_rgba(self.width, self.height, self.pixels.clone())
            .map(|bitmap| bitmap.with_scale(self.scale))
    }
}

/// Turn a core error into a JavaScript exception value.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
