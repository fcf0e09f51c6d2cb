//! Image decoding for the editing session.
//!
//! This module turns encoded file bytes into a [`PixelBuffer`](crate::PixelBuffer):
//! - Format detection from the byte signature (JPEG and PNG)
//! - EXIF orientation correction so the working buffer is upright
//! - Conversion to RGBA8
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let buffer = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", buffer.width(), buffer.height());
//! ```

mod load;
mod types;

pub use load::decode_image;
pub use types::{DecodeError, Orientation};
