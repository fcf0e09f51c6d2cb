//! Decode errors and EXIF orientation.

use image::DynamicImage;
use thiserror::Error;

use crate::buffer::BufferError;

/// Reasons a byte stream could not become a [`PixelBuffer`](crate::PixelBuffer).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Empty image data")]
    Empty,

    /// Signature matches neither JPEG nor PNG, or the codec refused a feature.
    #[error("Invalid or unsupported image format")]
    UnsupportedFormat,

    /// Recognized format, but the data is damaged or truncated.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    #[error("Decoded image is not a valid bitmap: {0}")]
    Buffer(#[from] BufferError),
}

/// How the camera was held, from the EXIF `Orientation` tag.
///
/// The discriminants are the tag values. Variant names describe the stored
/// pixels relative to an upright image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Upright = 1,
    Mirrored = 2,
    UpsideDown = 3,
    MirroredUpsideDown = 4,
    /// Mirrored, then stored rotated a quarter turn counter-clockwise
    MirroredRotatedLeft = 5,
    /// Stored rotated a quarter turn counter-clockwise
    RotatedLeft = 6,
    /// Mirrored, then stored rotated a quarter turn clockwise
    MirroredRotatedRight = 7,
    /// Stored rotated a quarter turn clockwise
    RotatedRight = 8,
}

impl Orientation {
    /// Map an EXIF tag value, or `None` if it is outside 1-8.
    pub fn from_exif(value: u32) -> Option<Self> {
        Some(match value {
            1 => Orientation::Upright,
            2 => Orientation::Mirrored,
            3 => Orientation::UpsideDown,
            4 => Orientation::MirroredUpsideDown,
            5 => Orientation::MirroredRotatedLeft,
            6 => Orientation::RotatedLeft,
            7 => Orientation::MirroredRotatedRight,
            8 => Orientation::RotatedRight,
            _ => return None,
        })
    }

    /// Transform stored pixels so they display upright.
    pub fn correct(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Upright => img,
            Orientation::Mirrored => img.fliph(),
            Orientation::UpsideDown => img.rotate180(),
            Orientation::MirroredUpsideDown => img.flipv(),
            Orientation::MirroredRotatedLeft => img.rotate90().fliph(),
            Orientation::RotatedLeft => img.rotate90(),
            Orientation::MirroredRotatedRight => img.rotate270().fliph(),
            Orientation::RotatedRight => img.rotate270(),
        }
    }
}
