//! Resampling to arbitrary output sizes.
//!
//! Resampling is delegated to the `image` crate's separable filters, which are
//! deterministic: the same input and size always produce the same bytes.

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::buffer::{byte_len, PixelBuffer};

/// Filter type for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor (fastest, blocky when upscaling).
    Nearest,
    /// Bilinear (triangle) interpolation.
    #[default]
    Bilinear,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `TransformError::InvalidDimension` if either side is zero or the
/// output would exceed [`MAX_PIXELS`](crate::buffer::MAX_PIXELS).
pub fn resize(
    image: &PixelBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<PixelBuffer, TransformError> {
    if width == 0 || height == 0 || byte_len(width, height).is_none() {
        return Err(TransformError::InvalidDimension { width, height });
    }

    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let resized = image::imageops::resize(
        &image.to_rgba_image(),
        width,
        height,
        filter.to_image_filter(),
    );

    Ok(PixelBuffer::from_parts(width, height, resized.into_raw()))
}
