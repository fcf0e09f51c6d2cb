//! PNG encoding for save/export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::buffer::PixelBuffer;

/// Errors that can occur while encoding or saving.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Writing to the destination failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode a buffer as PNG bytes (RGBA8, lossless).
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    write_png(buffer, &mut out)?;
    Ok(out)
}

/// Encode a buffer as PNG and write it to `path`.
///
/// The file is created or truncated. The buffer itself is never modified.
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_png(buffer, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_png<W: Write>(buffer: &PixelBuffer, writer: W) -> Result<(), EncodeError> {
    PngEncoder::new(writer)
        .write_image(
            buffer.pixels(),
            buffer.width(),
            buffer.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| match e {
            image::ImageError::IoError(io) => EncodeError::Io(io),
            other => EncodeError::EncodingFailed(other.to_string()),
        })
}
