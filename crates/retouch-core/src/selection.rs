//! Mapping on-screen drag selections to bitmap crop regions.
//!
//! The UI shows the working bitmap scaled into a viewport, so pointer
//! coordinates are in display space. A [`Selection`] records the drag and
//! [`Selection::to_crop_region`] converts it:
//!
//! 1. Normalize the two corners into a rectangle
//! 2. Divide by the display scale on each axis independently
//! 3. Clamp both edges to the bitmap and floor to whole pixels
//! 4. Reject the result if either side is empty

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transform::CropRegion;

/// Errors from selection mapping.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The selection covers no whole pixel of the bitmap.
    #[error("Selection is empty after clamping to the image")]
    EmptySelection,

    /// Display scale factors must be finite and positive.
    #[error("Invalid display scale: ({x}, {y})")]
    InvalidScale { x: f64, y: f64 },
}

/// A pointer position in display (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A normalized rectangle in display coordinates, for drawing the live
/// selection outline.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Ratio of displayed size to bitmap size, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayScale {
    x: f64,
    y: f64,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl DisplayScale {
    /// Create a scale with independent axis factors.
    pub fn new(x: f64, y: f64) -> Result<Self, SelectionError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(x) || !valid(y) {
            return Err(SelectionError::InvalidScale { x, y });
        }
        Ok(Self { x, y })
    }

    /// Same factor on both axes.
    pub fn uniform(factor: f64) -> Result<Self, SelectionError> {
        Self::new(factor, factor)
    }

    /// Aspect-preserving scale that fits a bitmap inside a viewport.
    pub fn fit(
        bitmap_width: u32,
        bitmap_height: u32,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, SelectionError> {
        let sx = viewport_width / bitmap_width as f64;
        let sy = viewport_height / bitmap_height as f64;
        Self::uniform(sx.min(sy))
    }

    /// Scale that stretches a bitmap to exactly fill a viewport.
    pub fn stretch(
        bitmap_width: u32,
        bitmap_height: u32,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<Self, SelectionError> {
        Self::new(
            viewport_width / bitmap_width as f64,
            viewport_height / bitmap_height as f64,
        )
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

/// An in-progress drag, from pointer-down to the latest pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start: Point,
    pub end: Point,
}

impl Selection {
    /// Start a selection at `start`. The end point begins at the same place.
    pub fn new(start: Point) -> Self {
        Self { start, end: start }
    }

    /// Selection between two explicit corners.
    pub fn between(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Move the free corner.
    pub fn update(&mut self, point: Point) {
        self.end = point;
    }

    /// Normalized display-space rectangle.
    pub fn rect(&self) -> SelectionRect {
        SelectionRect {
            x: self.start.x.min(self.end.x),
            y: self.start.y.min(self.end.y),
            width: (self.end.x - self.start.x).abs(),
            height: (self.end.y - self.start.y).abs(),
        }
    }

    /// Convert to a crop region of a `bitmap_width x bitmap_height` bitmap.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::EmptySelection` if nothing of the bitmap is
    /// covered after clamping, including zero-size drags and drags entirely
    /// outside the image.
    pub fn to_crop_region(
        &self,
        scale: DisplayScale,
        bitmap_width: u32,
        bitmap_height: u32,
    ) -> Result<CropRegion, SelectionError> {
        let rect = self.rect();
        let (left, right) = to_bitmap_span(rect.x, rect.width, scale.x, bitmap_width);
        let (top, bottom) = to_bitmap_span(rect.y, rect.height, scale.y, bitmap_height);

        if right <= left || bottom <= top {
            return Err(SelectionError::EmptySelection);
        }
        Ok(CropRegion::new(left, top, right - left, bottom - top))
    }
}

/// Map a display-space span onto `[0, limit]` in bitmap pixels.
fn to_bitmap_span(start: f64, length: f64, scale: f64, limit: u32) -> (u32, u32) {
    let limit_f = limit as f64;
    let lo = (start / scale).clamp(0.0, limit_f).floor();
    let hi = ((start + length) / scale).clamp(0.0, limit_f).floor();
    // NaN survives clamp; `as` maps it to 0, which yields an empty span
    (lo as u32, hi as u32)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
