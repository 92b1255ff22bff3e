//! Concrete transforms.
//!
//! A [`Transform`] describes *what* to do to a buffer with every random
//! choice already made. It is plain data: the
//! [`factory`](crate::factory) produces it, an
//! [`Executor`](super::backend::Executor) consumes it, and applying the same
//! `Transform` twice gives the same pixels.

use crate::types::TransformKind;

/// A fully parameterized operation, ready for execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Clockwise rotation about the image centre.
    Rotate { degrees: f64 },
    FlipHorizontal,
    FlipVertical,
    /// Multiply colour samples by `factor` (≥ 0).
    Brightness { factor: f64 },
    /// Separable Gaussian with an odd `kernel_size`.
    GaussianBlur { kernel_size: u32, sigma: f64 },
    /// Zero-mean Gaussian noise. `seed` makes the noise field reproducible.
    GaussianNoise { std_dev: f64, seed: u64 },
    /// Horizontal shear about the image centre.
    Shear { degrees: f64 },
    /// Uniform scale about the image centre; canvas size is kept.
    Zoom { factor: f64 },
    /// Hue shift in OpenCV half-degree units and saturation shift on a
    /// 0–255 scale. The value channel is never shifted.
    HueSaturation { hue_shift: f64, saturation_shift: f64 },
    /// Source quadrilateral (top-left, top-right, bottom-right, bottom-left)
    /// in fractions of width/height. It is stretched onto the full canvas.
    Perspective { corners: [[f64; 2]; 4] },
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Rotate { .. } => TransformKind::Rotation,
            Transform::FlipHorizontal => TransformKind::FlipHorizontal,
            Transform::FlipVertical => TransformKind::FlipVertical,
            Transform::Brightness { .. } => TransformKind::Brightness,
            Transform::GaussianBlur { .. } => TransformKind::Blur,
            Transform::GaussianNoise { .. } => TransformKind::Noise,
            Transform::Shear { .. } => TransformKind::Shear,
            Transform::Zoom { .. } => TransformKind::Zoom,
            Transform::HueSaturation { .. } => TransformKind::HueSaturation,
            Transform::Perspective { .. } => TransformKind::Perspective,
        }
    }

    /// True when the transform leaves every sample unchanged.
    pub fn is_identity(&self) -> bool {
        match *self {
            Transform::Rotate { degrees } | Transform::Shear { degrees } => degrees == 0.0,
            Transform::Brightness { factor } | Transform::Zoom { factor } => factor == 1.0,
            Transform::GaussianBlur { kernel_size, .. } => kernel_size <= 1,
            Transform::GaussianNoise { std_dev, .. } => std_dev == 0.0,
            Transform::HueSaturation {
                hue_shift,
                saturation_shift,
            } => hue_shift == 0.0 && saturation_shift == 0.0,
            Transform::Perspective { corners } => corners == UNIT_SQUARE,
            Transform::FlipHorizontal | Transform::FlipVertical => false,
        }
    }
}

/// Corners of the untouched image, in the order used by
/// [`Transform::Perspective`].
pub const UNIT_SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
