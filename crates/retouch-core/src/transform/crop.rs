//! Pixel-rectangle cropping.
//!
//! Regions are integer rectangles in bitmap space. Callers such as the
//! selection mapper clamp before cropping, but [`apply_crop`] re-validates
//! every region against the buffer it is given and refuses anything that
//! does not fit.
//!
//! # Example
//!
//! ```ignore
//! // Take the 4x4 block starting at (2, 2)
//! let cropped = apply_crop(&image, CropRegion::new(2, 2, 4, 4))?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TransformError;
use crate::buffer::{PixelBuffer, CHANNELS};

/// A crop rectangle in bitmap pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRegion {
    /// Left edge (inclusive)
    pub x: u32,
    /// Top edge (inclusive)
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Region covering an entire `width x height` bitmap.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive), or `None` on overflow.
    pub fn right(&self) -> Option<u32> {
        self.x.checked_add(self.width)
    }

    /// Bottom edge (exclusive), or `None` on overflow.
    pub fn bottom(&self) -> Option<u32> {
        self.y.checked_add(self.height)
    }

    /// Whether the region is non-empty and lies entirely inside a
    /// `bitmap_width x bitmap_height` bitmap.
    pub fn fits_within(&self, bitmap_width: u32, bitmap_height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.right().is_some_and(|r| r <= bitmap_width)
            && self.bottom().is_some_and(|b| b <= bitmap_height)
    }
}

impl fmt::Display for CropRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Copy `region` out of `image` into a new buffer of the region's size.
///
/// # Errors
///
/// Returns `TransformError::RegionOutOfBounds` if the region is empty or
/// extends past the image.
pub fn apply_crop(image: &PixelBuffer, region: CropRegion) -> Result<PixelBuffer, TransformError> {
    let (src_w, src_h) = image.dimensions();
    if !region.fits_within(src_w, src_h) {
        return Err(TransformError::RegionOutOfBounds {
            region,
            bitmap_width: src_w,
            bitmap_height: src_h,
        });
    }

    // Fast path: full crop returns a clone
    if region == CropRegion::full(src_w, src_h) {
        return Ok(image.clone());
    }

    let row_bytes = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);
    let src = image.pixels();

    // Copy pixel data row by row
    for y in region.y..region.y + region.height {
        let start = image.index_of(region.x, y);
        output.extend_from_slice(&src[start..start + row_bytes]);
    }

    Ok(PixelBuffer::from_parts(region.width, region.height, output))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
