//! Byte stream ↔ [`PixelBuffer`] conversion.
//!
//! | Direction | Formats | Crate / function |
//! |---|---|---|
//! | Identify | JPEG, PNG | `image::guess_format` (magic bytes) |
//! | Decode | JPEG, PNG | `image::ImageReader::with_format` |
//! | Encode | PNG (default), JPEG | `image::codecs::{png::PngEncoder, jpeg::JpegEncoder}` |
//!
//! Decoding always yields a 3-channel RGB buffer. Grayscale input is
//! expanded and **alpha is discarded**; callers that need transparency are
//! out of scope for this engine.

use crate::types::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Unsupported image format (expected JPEG or PNG)")]
    UnsupportedFormat,
    #[error("Corrupt image data: {0}")]
    CorruptData(String),
    #[error("Encoding failed: {0}")]
    EncodeError(String),
}

/// Input formats the decoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Jpeg,
    Png,
}

impl InputFormat {
    fn image_format(self) -> ImageFormat {
        match self {
            InputFormat::Jpeg => ImageFormat::Jpeg,
            InputFormat::Png => ImageFormat::Png,
        }
    }
}

/// Quality setting for lossy encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output formats the encoder produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg(Quality),
}

/// Identify the container format from the leading bytes.
pub fn guess_format(bytes: &[u8]) -> Result<InputFormat, CodecError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(InputFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(InputFormat::Png),
        _ => Err(CodecError::UnsupportedFormat),
    }
}

/// Decode JPEG or PNG bytes into an RGB buffer.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, CodecError> {
    let format = guess_format(bytes)?;
    let img = ImageReader::with_format(Cursor::new(bytes), format.image_format())
        .decode()
        .map_err(|e| CodecError::CorruptData(e.to_string()))?;
    Ok(PixelBuffer::from(img.to_rgb8()))
}

/// Encode a buffer. Any valid buffer encodes; JPEG output drops alpha.
pub fn encode(buffer: &PixelBuffer, format: OutputFormat) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let written = match format {
        OutputFormat::Png => PngEncoder::new(&mut out).write_image(
            buffer.as_bytes(),
            buffer.width(),
            buffer.height(),
            color_type(buffer.channels()),
        ),
        OutputFormat::Jpeg(quality) => {
            let encoder = JpegEncoder::new_with_quality(&mut out, quality.value());
            if buffer.channels() == 4 {
                let rgb = strip_alpha(buffer.as_bytes());
                encoder.write_image(
                    &rgb,
                    buffer.width(),
                    buffer.height(),
                    ExtendedColorType::Rgb8,
                )
            } else {
                encoder.write_image(
                    buffer.as_bytes(),
                    buffer.width(),
                    buffer.height(),
                    color_type(buffer.channels()),
                )
            }
        }
    };
    written.map_err(|e| CodecError::EncodeError(e.to_string()))?;
    Ok(out)
}

fn color_type(channels: u8) -> ExtendedColorType {
    match channels {
        1 => ExtendedColorType::L8,
        4 => ExtendedColorType::Rgba8,
        _ => ExtendedColorType::Rgb8,
    }
}

fn strip_alpha(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}
