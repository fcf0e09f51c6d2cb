//! Bitmap text rendering onto a pixel buffer.
//!
//! Text uses the 8x8 sans-serif face from `font8x8`, scaled up with
//! nearest-neighbor to approximate the requested font size:
//!
//! ```text
//! scale = max(1, round(font_size / 8))
//! ```
//!
//! The anchor `(x, y)` is the baseline of the first line. Glyph rows 0-6 sit
//! above the baseline and row 7 (descenders) starts on it, so the top of the
//! glyph cell is `y - 7 * scale`. Each further line starts `9 * scale` pixels
//! lower. Anything falling outside the buffer is clipped.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{PixelBuffer, CHANNELS};

/// Glyph cell size of the bitmap face, in unscaled pixels.
const GLYPH_SIZE: i64 = 8;

/// Rows of a glyph cell above the baseline.
const ASCENT_ROWS: i64 = 7;

/// Line pitch, in unscaled pixels.
const LINE_HEIGHT: i64 = 9;

/// Errors from text rendering.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TextError {
    /// Text is empty or only whitespace.
    #[error("Text to add cannot be empty")]
    EmptyText,

    /// Font size is zero, negative or not a number.
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f32),
}

/// Appearance of rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Nominal font size in pixels
    pub font_size: f32,
    /// Fill color (RGBA)
    pub color: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            color: [255, 255, 255, 255],
        }
    }
}

impl TextStyle {
    pub fn new(font_size: f32, color: [u8; 4]) -> Self {
        Self { font_size, color }
    }

    /// Integer glyph magnification for this font size.
    pub fn glyph_scale(&self) -> Result<u32, TextError> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(TextError::InvalidFontSize(self.font_size));
        }
        Ok(((self.font_size / GLYPH_SIZE as f32).round() as u32).max(1))
    }
}

/// Render `text` into a copy of `buffer` with its baseline at `(x, y)`.
///
/// # Errors
///
/// Returns `TextError::EmptyText` for empty or whitespace-only text and
/// `TextError::InvalidFontSize` for a non-positive or non-finite size.
/// Validation happens before any pixel is touched.
pub fn draw_text(
    buffer: &PixelBuffer,
    text: &str,
    style: &TextStyle,
    x: i32,
    y: i32,
) -> Result<PixelBuffer, TextError> {
    if text.trim().is_empty() {
        return Err(TextError::EmptyText);
    }
    let scale = style.glyph_scale()? as i64;

    let mut output = buffer.clone();
    let (width, height) = (output.width() as i64, output.height() as i64);
    let pixels = output.pixels_mut();

    let mut origin_y = y as i64 - ASCENT_ROWS * scale;
    for line in text.split('\n') {
        let mut origin_x = x as i64;
        for ch in line.chars() {
            let glyph = BASIC_FONTS
                .get(ch)
                .or_else(|| BASIC_FONTS.get('?'))
                .unwrap_or([0; 8]);

            for (row, bits) in glyph.iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if (bits >> col) & 1 == 0 {
                        continue;
                    }
                    let px = origin_x + col * scale;
                    let py = origin_y + row as i64 * scale;
                    fill_block(pixels, width, height, px, py, scale, style.color);
                }
            }
            origin_x += GLYPH_SIZE * scale;
        }
        origin_y += LINE_HEIGHT * scale;
    }

    Ok(output)
}

/// Fill a `size x size` block at `(left, top)`, clipped to the buffer.
fn fill_block(
    pixels: &mut [u8],
    width: i64,
    height: i64,
    left: i64,
    top: i64,
    size: i64,
    color: [u8; 4],
) {
    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + size).min(width);
    let y1 = (top + size).min(height);

    for py in y0..y1 {
        for px in x0..x1 {
            let idx = (py * width + px) as usize * CHANNELS;
            blend_over(&mut pixels[idx..idx + CHANNELS], color);
        }
    }
}

/// Source-over blend of `color` onto `dst`.
#[inline]
fn blend_over(dst: &mut [u8], color: [u8; 4]) {
    let alpha = color[3] as f32 / 255.0;
    if alpha >= 1.0 {
        dst.copy_from_slice(&color);
        return;
    }
    for c in 0..3 {
        let v = color[c] as f32 * alpha + dst[c] as f32 * (1.0 - alpha);
        dst[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    let out_a = color[3] as f32 + dst[3] as f32 * (1.0 - alpha);
    dst[3] = out_a.round().clamp(0.0, 255.0) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn canvas(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::filled(width, height, BLACK).unwrap()
    }

    fn style(size: f32) -> TextStyle {
        TextStyle::new(size, WHITE)
    }

    fn lit_pixels(buf: &PixelBuffer) -> Vec<(u32, u32)> {
        let mut lit = Vec::new();
        for y in 0..buf.height() {
            for x in 0..buf.width() {
                if buf.pixel(x, y) != Some(BLACK) {
                    lit.push((x, y));
                }
            }
        }
        lit
    }

    #[test]
    fn test_empty_text_rejected() {
        let buf = canvas(10, 10);
        assert_eq!(draw_text(&buf, "", &style(8.0), 0, 7), Err(TextError::EmptyText));
        assert_eq!(
            draw_text(&buf, "  \t\n ", &style(8.0), 0, 7),
            Err(TextError::EmptyText)
        );
    }

    #[test]
    fn test_invalid_font_size_rejected() {
        let buf = canvas(10, 10);
        for size in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                draw_text(&buf, "A", &style(size), 0, 7),
                Err(TextError::InvalidFontSize(_))
            ));
        }
    }

    #[test]
    fn test_glyph_scale() {
        assert_eq!(style(1.0).glyph_scale(), Ok(1));
        assert_eq!(style(8.0).glyph_scale(), Ok(1));
        assert_eq!(style(16.0).glyph_scale(), Ok(2));
        assert_eq!(style(20.0).glyph_scale(), Ok(3));
    }

    #[test]
    fn test_glyph_matches_font_table() {
        let buf = canvas(8, 8);
        // Baseline at row 7 puts the cell top at row 0
        let out = draw_text(&buf, "H", &style(8.0), 0, 7).unwrap();
        let glyph = BASIC_FONTS.get('H').unwrap();

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                let expected = if (bits >> col) & 1 == 1 { WHITE } else { BLACK };
                assert_eq!(out.pixel(col, row as u32), Some(expected));
            }
        }
    }

    #[test]
    fn test_text_stays_inside_its_cell() {
        let buf = canvas(40, 40);
        let out = draw_text(&buf, "Hi", &style(16.0), 5, 30).unwrap();

        let lit = lit_pixels(&out);
        assert!(!lit.is_empty());
        // scale 2: cell top = 30 - 14 = 16, two glyphs 16px wide each
        for (x, y) in lit {
            assert!((5..37).contains(&x), "x {} outside text cell", x);
            assert!((16..32).contains(&y), "y {} outside text cell", y);
        }
    }

    #[test]
    fn test_source_buffer_unchanged() {
        let buf = canvas(16, 16);
        let before = buf.clone();
        let _ = draw_text(&buf, "X", &style(8.0), 2, 10).unwrap();
        assert_eq!(buf, before);
    }

    #[test]
    fn test_offscreen_text_clipped() {
        let buf = canvas(10, 10);
        let out = draw_text(&buf, "Hello", &style(8.0), 100, 100).unwrap();
        assert_eq!(out, buf);

        let out = draw_text(&buf, "Hello", &style(8.0), -100, -100).unwrap();
        assert_eq!(out, buf);
    }

    #[test]
    fn test_partially_visible_text() {
        let buf = canvas(10, 10);
        // Most of the word hangs off the right edge
        let out = draw_text(&buf, "WWWW", &style(8.0), 6, 7).unwrap();
        let lit = lit_pixels(&out);
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|&(x, _)| x >= 6));
    }

    #[test]
    fn test_multiline_advances_down() {
        let buf = canvas(10, 30);
        let out = draw_text(&buf, "H\nH", &style(8.0), 0, 7).unwrap();
        // Second line is one line height (9px) below the first
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(out.pixel(x, y), out.pixel(x, y + 9));
            }
        }
    }

    #[test]
    fn test_unknown_char_renders_placeholder() {
        let buf = canvas(8, 8);
        let unknown = draw_text(&buf, "\u{1F600}", &style(8.0), 0, 7).unwrap();
        let question = draw_text(&buf, "?", &style(8.0), 0, 7).unwrap();
        assert_eq!(unknown, question);
    }

    #[test]
    fn test_translucent_color_blends() {
        let buf = canvas(8, 8);
        let half = TextStyle::new(8.0, [255, 0, 0, 128]);
        let out = draw_text(&buf, "#", &half, 0, 7).unwrap();
        let lit = lit_pixels(&out);
        assert!(!lit.is_empty());
        let (x, y) = lit[0];
        let px = out.pixel(x, y).unwrap();
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert_eq!(px[1], 0);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_default_style_is_white() {
        assert_eq!(TextStyle::default().color, WHITE);
    }
}
