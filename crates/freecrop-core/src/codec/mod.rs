//! Bitmap type and image codecs.
//!
//! This module provides:
//! - [`Bitmap`], the RGBA buffer every pixel operation in the crate works on
//! - Decoding PNG/JPEG bytes into a bitmap
//! - Encoding a bitmap to PNG, keeping its alpha channel
//!
//! # Examples
//!
//! ```ignore
//! use freecrop_core::codec::{decode_image, encode_png};
//!
//! let bitmap = decode_image(&std::fs::read("photo.png").unwrap()).unwrap();
//! let png = encode_png(&bitmap).unwrap();
//! ```

mod decode;
mod encode;
mod types;

pub use decode::decode_image;
pub use encode::encode_png;
pub use types::{Bitmap, BitmapError, CodecError, Orientation, BYTES_PER_PIXEL};
