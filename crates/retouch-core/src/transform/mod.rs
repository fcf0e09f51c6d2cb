//! Geometric transforms: quarter-turn rotation, resize and crop.
//!
//! Every transform allocates a new buffer sized to its output and never
//! resizes its input in place, so the "before" buffer stays valid until the
//! caller decides to drop it.
//!
//! # Coordinate System
//!
//! - Origin is the top-left pixel
//! - Crop regions are integer pixel rectangles in bitmap space
//! - Rotation is clockwise, without flipping

mod crop;
mod resize;
mod rotation;

use thiserror::Error;

pub use crop::{apply_crop, CropRegion};
pub use resize::{resize, FilterType};
pub use rotation::rotate_90;

/// Errors from geometric transforms.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Requested output size has a zero side or is too large.
    #[error("Invalid dimensions: {width}x{height} is empty or exceeds the supported size")]
    InvalidDimension { width: u32, height: u32 },

    /// Crop region is empty or extends past the bitmap.
    #[error(
        "Crop region {region} does not fit inside a {bitmap_width}x{bitmap_height} bitmap"
    )]
    RegionOutOfBounds {
        region: CropRegion,
        bitmap_width: u32,
        bitmap_height: u32,
    },
}
