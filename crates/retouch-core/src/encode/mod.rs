//! Lossless output encoding.
//!
//! The session saves its working buffer as PNG, either straight to a path or
//! into a byte vector for hosts without a file system (the WASM binding).
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{encode_png, save_png};
//!
//! let bytes = encode_png(&buffer).unwrap();
//! save_png(&buffer, "edited.png").unwrap();
//! ```

mod png;

pub use png::{encode_png, save_png, EncodeError};
