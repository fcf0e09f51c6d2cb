//! RGBA pixel storage shared by every engine in the pipeline.

use thiserror::Error;

/// Number of bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Largest supported pixel count (16384 x 16384).
pub const MAX_PIXELS: u64 = 1 << 28;

/// Errors raised when constructing a [`PixelBuffer`] from raw parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    ZeroDimension { width: u32, height: u32 },

    /// Dimensions exceed [`MAX_PIXELS`] or the address space.
    #[error("Image too large: {width}x{height} exceeds the supported size")]
    TooLarge { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// An owned RGBA8 bitmap.
///
/// Pixel data is stored row-major with 4 bytes per pixel and always has
/// exactly `width * height * 4` bytes. Dimensions never change after
/// construction; transforms that change the size produce a new buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from dimensions and RGBA pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BufferError> {
        let expected = Self::expected_len(width, height)?;
        if pixels.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer from parts the caller has already sized correctly.
    pub(crate) fn from_parts(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, BufferError> {
        let expected = Self::expected_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(expected).collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage` for use with the `image` crate.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let idx = self.index_of(x, y);
            let px = &self.pixels[idx..idx + CHANNELS];
            image::Rgba([px[0], px[1], px[2], px[3]])
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access for engines that draw in place.
    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// RGBA value at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index_of(x, y);
        let px = &self.pixels[idx..idx + CHANNELS];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Byte offset of pixel `(x, y)`. Caller guarantees bounds.
    #[inline]
    pub(crate) fn index_of(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    fn expected_len(width: u32, height: u32) -> Result<usize, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }
        byte_len(width, height).ok_or(BufferError::TooLarge { width, height })
    }
}

/// Byte length of a `width x height` RGBA buffer, or `None` if it is over
/// [`MAX_PIXELS`] or does not fit in `usize`.
pub(crate) fn byte_len(width: u32, height: u32) -> Option<usize> {
    let pixels = (width as u64).checked_mul(height as u64)?;
    if pixels > MAX_PIXELS {
        return None;
    }
    usize::try_from(pixels * CHANNELS as u64).ok()
}
