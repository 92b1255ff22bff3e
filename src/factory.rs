//! Turn a validated request into a concrete [`Transform`].
//!
//! This is the only place randomness is consumed. The generator is always
//! supplied by the caller, so a seeded `StdRng` reproduces a transform
//! exactly, and the executor itself stays deterministic.

use crate::imaging::calculations::{blur_kernel_sizes, sigma_for_kernel, zoom_bounds};
use crate::imaging::params::Transform;
use crate::registry::{AugmentationRequest, KindParams};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Sample a concrete transform for `request`.
///
/// | Kind | Sampling |
/// |---|---|
/// | Rotation / Shear | degrees in `[-|p|, |p|]` |
/// | Brightness | factor in `[1 - b, 1 + b]`, floored at 0 |
/// | Blur | odd kernel from [`blur_kernel_sizes`] |
/// | Noise | variance in `[0, noise]`, plus a fresh noise seed |
/// | Zoom | factor in `1 ± zoom / 100`, sign of `zoom` ignored |
/// | Hue & Saturation | each shift in `[-|p|, |p|]` |
/// | Perspective | each corner moved inward by up to `scale` per axis |
pub fn build_transform<R: Rng>(request: &AugmentationRequest, rng: &mut R) -> Transform {
    match *request.params() {
        KindParams::Rotation { angle } => Transform::Rotate {
            degrees: symmetric(rng, angle),
        },
        KindParams::FlipHorizontal => Transform::FlipHorizontal,
        KindParams::FlipVertical => Transform::FlipVertical,
        KindParams::Brightness { brightness } => Transform::Brightness {
            factor: uniform(rng, 1.0 - brightness, 1.0 + brightness).max(0.0),
        },
        KindParams::Blur { blur } => {
            let sizes = blur_kernel_sizes(blur);
            let kernel_size = sizes.choose(rng).copied().unwrap_or(1);
            Transform::GaussianBlur {
                kernel_size,
                sigma: sigma_for_kernel(kernel_size),
            }
        }
        KindParams::Noise { noise } => Transform::GaussianNoise {
            std_dev: uniform(rng, 0.0, noise).sqrt(),
            seed: rng.random(),
        },
        KindParams::Shear { shear } => Transform::Shear {
            degrees: symmetric(rng, shear),
        },
        KindParams::Zoom { zoom } => {
            let (lo, hi) = zoom_bounds(zoom);
            Transform::Zoom {
                factor: uniform(rng, lo, hi),
            }
        }
        KindParams::HueSaturation { hue, saturation } => Transform::HueSaturation {
            hue_shift: symmetric(rng, hue),
            saturation_shift: symmetric(rng, saturation),
        },
        KindParams::Perspective { perspective } => Transform::Perspective {
            corners: perspective_corners(rng, perspective),
        },
    }
}

/// Uniform draw from `[lo, hi]`; a collapsed range returns `lo` without
/// drawing.
fn uniform<R: Rng>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if lo >= hi {
        lo
    } else {
        rng.random_range(lo..=hi)
    }
}

fn symmetric<R: Rng>(rng: &mut R, magnitude: f64) -> f64 {
    let m = magnitude.abs();
    uniform(rng, -m, m)
}

/// Corner order: top-left, top-right, bottom-right, bottom-left. Each moves
/// towards the inside of the image.
fn perspective_corners<R: Rng>(rng: &mut R, scale: f64) -> [[f64; 2]; 4] {
    let mut inset = || uniform(rng, 0.0, scale);
    [
        [inset(), inset()],
        [1.0 - inset(), inset()],
        [1.0 - inset(), 1.0 - inset()],
        [inset(), 1.0 - inset()],
    ]
}
