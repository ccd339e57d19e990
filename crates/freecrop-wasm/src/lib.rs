//! FreeCrop WASM - WebAssembly bindings for FreeCrop
//!
//! This crate exposes the freecrop-core selection engine to
//! JavaScript/TypeScript hosts.
//!
//! # Module Structure
//!
//! - `session` - Interactive selection sessions (crop box, polygon, lasso)
//! - `trim` - Transparent-border trimming
//! - `codec` - Image decoding and PNG encoding
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, encode_png, JsSelectionSession } from '@freecrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const source = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const session = new JsSelectionSession(source.width, source.height, 0, 0, 428, 328, 'polygon');
//! // ... forward pointer events, flush events each frame ...
//! const png = encode_png(session.finish(source));
//! ```

use log::LevelFilter;
use wasm_bindgen::prelude::*;

mod codec;
mod logger;
mod session;
mod trim;
mod types;

// Re-export public types
pub use codec::{decode_image, encode_png};
pub use session::JsSelectionSession;
pub use trim::{opaque_insets, trim_transparent};
pub use types::JsBitmap;

/// Initialize the WASM module (called automatically on load).
///
/// Routes core log records to the browser console at `info` level.
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(LevelFilter::Info);
}

/// Change how much the engine logs to the console.
///
/// Accepts `off`, `error`, `warn`, `info`, `debug` or `trace`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level = logger::parse_level(level)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown log level: {}", level)))?;
    logger::install(level);
    Ok(())
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Milliseconds to wait after a rotation before calling
/// `complete_orientation_change` when the host has no rotation-complete
/// signal.
#[wasm_bindgen]
pub fn rotation_settle_delay_ms() -> u32 {
    freecrop_core::ROTATION_SETTLE_DELAY.as_millis() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_rotation_settle_delay() {
        assert_eq!(rotation_settle_delay_ms(), 300);
    }
}
