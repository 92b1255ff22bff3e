//! Shared types used by every stage of the engine.
//!
//! [`PixelBuffer`] is the one canonical raster representation: codec output,
//! executor input and output, and service result all use it. Conversion to
//! the `image` crate's buffer types happens at the codec boundary and inside
//! the noise kernel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("Buffer dimensions must be positive (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("Unsupported channel count: {0} (expected 1, 3 or 4)")]
    UnsupportedChannels(u8),
    #[error("Sample count {actual} does not match {width}x{height}x{channels} = {expected}")]
    LengthMismatch {
        width: u32,
        height: u32,
        channels: u8,
        expected: usize,
        actual: usize,
    },
}

/// Row-major, interleaved 8-bit raster.
///
/// The fields are private so the length invariant
/// (`data.len() == width * height * channels`) holds for every value that
/// exists. Transforms that change shape build a new buffer instead of
/// mutating one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::ZeroDimension { width, height });
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(BufferError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(BufferError::LengthMismatch {
                width,
                height,
                channels,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// A buffer with every pixel set to `pixel` (whose length is the channel count).
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> Result<Self, BufferError> {
        let count = width as usize * height as usize;
        let data = pixel.repeat(count);
        Self::new(width, height, pixel.len() as u8, data)
    }

    /// A buffer of the same shape as `self` holding `data`.
    pub(crate) fn with_same_shape(&self, data: Vec<u8>) -> Result<Self, BufferError> {
        Self::new(self.width, self.height, self.channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// Samples of the pixel at `(x, y)`. Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = y as usize * self.stride() + x as usize * c;
        &self.data[start..start + c]
    }

    /// Number of leading channels that carry colour; alpha is excluded.
    pub fn color_channels(&self) -> usize {
        if self.channels == 4 {
            3
        } else {
            self.channels as usize
        }
    }
}

impl From<image::RgbImage> for PixelBuffer {
    fn from(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            channels: 3,
            data: img.into_raw(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported transform kind: '{0}'")]
pub struct UnsupportedKind(pub String);

/// The closed catalog of augmentations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformKind {
    Rotation,
    FlipHorizontal,
    FlipVertical,
    Brightness,
    Blur,
    Noise,
    Shear,
    Zoom,
    HueSaturation,
    Perspective,
}

impl TransformKind {
    pub const ALL: [TransformKind; 10] = [
        TransformKind::Rotation,
        TransformKind::FlipHorizontal,
        TransformKind::FlipVertical,
        TransformKind::Brightness,
        TransformKind::Blur,
        TransformKind::Noise,
        TransformKind::Shear,
        TransformKind::Zoom,
        TransformKind::HueSaturation,
        TransformKind::Perspective,
    ];

    /// Stable machine name, used on the command line and in config files.
    pub fn slug(self) -> &'static str {
        match self {
            TransformKind::Rotation => "rotation",
            TransformKind::FlipHorizontal => "flip-horizontal",
            TransformKind::FlipVertical => "flip-vertical",
            TransformKind::Brightness => "brightness",
            TransformKind::Blur => "blur",
            TransformKind::Noise => "noise",
            TransformKind::Shear => "shear",
            TransformKind::Zoom => "zoom",
            TransformKind::HueSaturation => "hue-saturation",
            TransformKind::Perspective => "perspective",
        }
    }

    /// Human-facing name.
    pub fn label(self) -> &'static str {
        match self {
            TransformKind::Rotation => "Rotation",
            TransformKind::FlipHorizontal => "Flip Horizontal",
            TransformKind::FlipVertical => "Flip Vertical",
            TransformKind::Brightness => "Brightness",
            TransformKind::Blur => "Blur",
            TransformKind::Noise => "Noise",
            TransformKind::Shear => "Shear",
            TransformKind::Zoom => "Zoom",
            TransformKind::HueSaturation => "Hue & Saturation",
            TransformKind::Perspective => "Random Perspective",
        }
    }

    /// Download name: `augmented_` + label with spaces → underscores, lowercased.
    ///
    /// ```
    /// # use pixel_augment::types::TransformKind;
    /// assert_eq!(TransformKind::FlipHorizontal.file_name(), "augmented_flip_horizontal.png");
    /// ```
    pub fn file_name(self) -> String {
        format!(
            "augmented_{}.png",
            self.label().replace(' ', "_").to_lowercase()
        )
    }

    /// Whether building this kind draws from the randomness source.
    pub fn is_stochastic(self) -> bool {
        !matches!(
            self,
            TransformKind::FlipHorizontal | TransformKind::FlipVertical
        )
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the slug, the label, or the variant name, ignoring case.
impl FromStr for TransformKind {
    type Err = UnsupportedKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = normalize_kind_name(s);
        TransformKind::ALL
            .into_iter()
            .find(|kind| {
                normalize_kind_name(kind.slug()) == needle
                    || normalize_kind_name(kind.label()) == needle
                    || normalize_kind_name(&format!("{kind:?}")) == needle
            })
            .ok_or_else(|| UnsupportedKind(s.to_string()))
    }
}

/// Lowercase and keep only ASCII letters and digits, so `Hue & Saturation`,
/// `hue-saturation` and `HueSaturation` compare equal.
fn normalize_kind_name(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Output of one augmentation. Owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub buffer: PixelBuffer,
    pub kind: TransformKind,
}

impl TransformResult {
    /// Download name for the result, see [`TransformKind::file_name`].
    pub fn file_name(&self) -> String {
        self.kind.file_name()
    }
}
