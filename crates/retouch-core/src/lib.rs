//! Retouch Core - Image editing library
//!
//! This crate provides the editing engine behind Retouch: RGBA pixel buffers,
//! color-matrix filters, geometric transforms, bitmap text overlay, and the
//! session that ties them to a single loaded image.

pub mod buffer;
pub mod color_matrix;
pub mod decode;
pub mod encode;
pub mod selection;
pub mod session;
pub mod text;
pub mod transform;

pub use buffer::{BufferError, PixelBuffer};
pub use color_matrix::{apply_matrix, ColorMatrix, FilterKind};
pub use selection::{DisplayScale, Point, Selection, SelectionError, SelectionRect};
pub use session::{
    AdjustmentMode, Adjustments, BufferObserver, ImageHandle, ImageSession, SessionConfig,
    SessionError, SessionState, TextParams,
};
pub use text::{draw_text, TextError, TextStyle};
pub use transform::{apply_crop, resize, rotate_90, CropRegion, FilterType, TransformError};
