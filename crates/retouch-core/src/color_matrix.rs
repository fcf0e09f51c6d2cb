//! Affine color-matrix filters.
//!
//! Every color effect in the editor is a 5x4 matrix applied to each pixel as
//! a row vector:
//!
//! ```text
//! [R' G' B' A'] = [R G B A 1] x M
//! ```
//!
//! Rows 0-3 hold the weights of the R, G, B and A inputs, row 4 holds the
//! translation terms. The homogeneous fifth output column is implicit, so the
//! constant `1` is always preserved. Channels are normalized to 0.0-1.0 before
//! the multiply and clamped (never wrapped) on the way back to 0-255.

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CHANNELS};

/// Luminance weights used by the grayscale filter.
pub const GRAY_R: f32 = 0.3;
pub const GRAY_G: f32 = 0.59;
pub const GRAY_B: f32 = 0.11;

/// Fixed-coefficient filters the session can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    /// Warm brown tone.
    Sepia,
    /// Luminance-weighted black and white.
    Grayscale,
}

impl FilterKind {
    /// The color matrix implementing this filter.
    pub fn matrix(self) -> ColorMatrix {
        match self {
            FilterKind::Sepia => ColorMatrix::sepia(),
            FilterKind::Grayscale => ColorMatrix::grayscale(),
        }
    }
}

/// A 5x4 affine transform over (R, G, B, A, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMatrix {
    rows: [[f32; 4]; 5],
}

impl Default for ColorMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl ColorMatrix {
    /// Build a matrix from its five rows (R, G, B, A weights, then offsets).
    pub const fn new(rows: [[f32; 4]; 5]) -> Self {
        Self { rows }
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    /// Additive brightness offset.
    ///
    /// `level` is in slider units (-255 to 255). The offset `level / 255` is
    /// added to R, G and B; there is no channel scaling.
    pub fn brightness(level: f32) -> Self {
        let b = level / 255.0;
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [b, b, b, 0.0],
        ])
    }

    /// Contrast pivoting around mid-gray.
    ///
    /// `level` is a percentage offset from neutral (0 = unchanged).
    ///
    /// Formula: `output = input * scale + 0.5 * (1 - scale)` where
    /// `scale = 1 + level / 100`
    pub fn contrast(level: f32) -> Self {
        let scale = 1.0 + level / 100.0;
        let offset = 0.5 * (1.0 - scale);
        Self::new([
            [scale, 0.0, 0.0, 0.0],
            [0.0, scale, 0.0, 0.0],
            [0.0, 0.0, scale, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [offset, offset, offset, 0.0],
        ])
    }

    /// Classic sepia tone.
    pub const fn sepia() -> Self {
        Self::new([
            [0.393, 0.349, 0.272, 0.0],
            [0.769, 0.686, 0.534, 0.0],
            [0.189, 0.168, 0.131, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    /// Black and white using `0.3 R + 0.59 G + 0.11 B` on every channel.
    pub const fn grayscale() -> Self {
        Self::new([
            [GRAY_R, GRAY_R, GRAY_R, 0.0],
            [GRAY_G, GRAY_G, GRAY_G, 0.0],
            [GRAY_B, GRAY_B, GRAY_B, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 0.0],
        ])
    }

    /// Compose two transforms: the result applies `self` first, then `next`.
    ///
    /// Clamping only happens once at the end, so chained matrices can differ
    /// from sequential application when an intermediate value leaves 0.0-1.0.
    pub fn then(&self, next: &ColorMatrix) -> ColorMatrix {
        let mut rows = [[0.0f32; 4]; 5];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, out) in row.iter_mut().enumerate() {
                let mut sum: f32 = (0..4).map(|k| self.rows[i][k] * next.rows[k][j]).sum();
                if i == 4 {
                    sum += next.rows[4][j];
                }
                *out = sum;
            }
        }
        ColorMatrix::new(rows)
    }

    /// Transform one normalized RGBA sample. Output is not clamped.
    #[inline]
    pub fn transform(&self, rgba: [f32; 4]) -> [f32; 4] {
        let m = &self.rows;
        let mut out = m[4];
        for (input, row) in rgba.iter().zip(m.iter()) {
            for (o, w) in out.iter_mut().zip(row.iter()) {
                *o += input * w;
            }
        }
        out
    }

    /// Whether this matrix leaves every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }
}

/// Apply a color matrix to every pixel, returning a new buffer.
pub fn apply_matrix(buffer: &PixelBuffer, matrix: &ColorMatrix) -> PixelBuffer {
    let mut output = buffer.clone();
    apply_matrix_in_place(output.pixels_mut(), matrix);
    output
}

/// Apply a color matrix to raw RGBA bytes in place.
fn apply_matrix_in_place(pixels: &mut [u8], matrix: &ColorMatrix) {
    if matrix.is_identity() {
        return;
    }

    for chunk in pixels.chunks_exact_mut(CHANNELS) {
        let input = [
            chunk[0] as f32 / 255.0,
            chunk[1] as f32 / 255.0,
            chunk[2] as f32 / 255.0,
            chunk[3] as f32 / 255.0,
        ];
        let out = matrix.transform(input);
        for (dst, v) in chunk.iter_mut().zip(out) {
            *dst = to_u8(v);
        }
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}


// ============================================================================
// Property-Based Tests
// ============================================================================
