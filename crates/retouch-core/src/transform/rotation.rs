//! Lossless quarter-turn rotation.
//!
//! For a clockwise turn of a `w x h` image the output is `h x w` and
//!
//! ```text
//! dst(x, y) = src(y, h - 1 - x)
//! ```
//!
//! which is equivalent to moving each source pixel `(sx, sy)` to
//! `(h - 1 - sy, sx)`. Whole pixels are copied, so four turns reproduce the
//! original exactly.

use crate::buffer::{PixelBuffer, CHANNELS};

/// Rotate an image 90 degrees clockwise.
pub fn rotate_90(image: &PixelBuffer) -> PixelBuffer {
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = (src_h, src_w);

    let src = image.pixels();
    let mut output = vec![0u8; src.len()];

    for sy in 0..src_h {
        let dst_x = src_h - 1 - sy;
        for sx in 0..src_w {
            let src_idx = image.index_of(sx, sy);
            let dst_idx = (sx as usize * dst_w as usize + dst_x as usize) * CHANNELS;
            output[dst_idx..dst_idx + CHANNELS].copy_from_slice(&src[src_idx..src_idx + CHANNELS]);
        }
    }

    PixelBuffer::from_parts(dst_w, dst_h, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel encodes its position.
    fn test_image(width: u32, height: u32) -> PixelBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, ((y * width + x) % 256) as u8, 255]);
            }
        }
        PixelBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let img = test_image(5, 3);
        let result = rotate_90(&img);
        assert_eq!(result.dimensions(), (3, 5));
        assert_eq!(result.pixels().len(), img.pixels().len());
    }

    #[test]
    fn test_rotate_clockwise_corners() {
        // 2x2:  A B      C A
        //       C D  ->  D B
        let a = [1, 0, 0, 255];
        let b = [2, 0, 0, 255];
        let c = [3, 0, 0, 255];
        let d = [4, 0, 0, 255];
        let pixels = [a, b, c, d].concat();
        let img = PixelBuffer::new(2, 2, pixels).unwrap();

        let result = rotate_90(&img);
        assert_eq!(result.pixel(0, 0), Some(c));
        assert_eq!(result.pixel(1, 0), Some(a));
        assert_eq!(result.pixel(0, 1), Some(d));
        assert_eq!(result.pixel(1, 1), Some(b));
    }

    #[test]
    fn test_rotate_source_mapping() {
        let img = test_image(4, 3);
        let result = rotate_90(&img);

        for y in 0..result.height() {
            for x in 0..result.width() {
                // dst(x, y) = src(y, h - 1 - x)
                assert_eq!(result.pixel(x, y), img.pixel(y, img.height() - 1 - x));
            }
        }
    }

    #[test]
    fn test_rotate_single_row() {
        let img = test_image(4, 1);
        let result = rotate_90(&img);
        assert_eq!(result.dimensions(), (1, 4));
        // Left-most pixel ends up on top
        assert_eq!(result.pixel(0, 0), img.pixel(0, 0));
        assert_eq!(result.pixel(0, 3), img.pixel(3, 0));
    }

    #[test]
    fn test_four_rotations_identity() {
        let img = test_image(7, 4);
        let result = rotate_90(&rotate_90(&rotate_90(&rotate_90(&img))));
        assert_eq!(result, img);
    }

    #[test]
    fn test_two_rotations_is_180() {
        let img = test_image(3, 2);
        let result = rotate_90(&rotate_90(&img));
        assert_eq!(result.dimensions(), (3, 2));
        assert_eq!(result.pixel(0, 0), img.pixel(2, 1));
        assert_eq!(result.pixel(2, 1), img.pixel(0, 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
