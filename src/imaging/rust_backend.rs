//! Pure Rust executor.
//!
//! ## Operation mapping
//!
//! | Transform | Implementation |
//! |---|---|
//! | Rotate, Shear, Zoom | affine [`Projection`](imageproc::geometric_transformations::Projection) about the centre + [`warp`](super::warp::warp) |
//! | Perspective | `Projection::from_control_points` + [`warp`](super::warp::warp) |
//! | Flips | row / column reversal (lossless) |
//! | Brightness | per-sample multiply, clamped |
//! | GaussianBlur | separable convolution, replicate-edge |
//! | GaussianNoise | [`imageproc::noise::gaussian_noise`] over the colour samples |
//! | HueSaturation | RGB → HSV → shift → RGB |
//!
//! Rows are processed in parallel with rayon, except for noise, which draws
//! every sample from one generator seeded by the transform.
//!
//! Brightness, noise and hue/saturation leave the alpha channel of RGBA
//! buffers untouched; blur and the geometric transforms treat alpha like any
//! other channel.

use super::backend::{ExecError, Executor};
use super::calculations::{clamp_sample, gaussian_kernel, hsv_to_rgb, rgb_to_hsv};
use super::params::Transform;
use super::warp;
use crate::types::{BufferError, PixelBuffer};
use image::{GrayImage, Luma};
use log::trace;
use rayon::prelude::*;

/// Added to the HSV value channel by hue/saturation. Fixed at zero: only hue
/// and saturation are tunable.
const VALUE_SHIFT: f32 = 0.0;

/// Degrees per OpenCV hue unit (hue is stored as 0–179 there).
const DEGREES_PER_HUE_UNIT: f64 = 2.0;

/// Pure Rust executor using `imageproc` projections and in-crate kernels.
///
/// See the [module docs](self) for the operation mapping.
pub struct RustExecutor;

impl RustExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RustExecutor {
    fn apply(&self, input: &PixelBuffer, transform: &Transform) -> Result<PixelBuffer, ExecError> {
        if transform.is_identity() {
            trace!("{} is an identity, copying input", transform.kind());
            return Ok(input.clone());
        }

        let (w, h) = (input.width(), input.height());
        let degenerate = ExecError::DegenerateProjection {
            kind: transform.kind(),
        };
        let output = match *transform {
            Transform::Rotate { degrees } => {
                warp::warp(input, &warp::rotation(w, h, degrees).invert())?
            }
            Transform::Shear { degrees } => {
                let forward = warp::shear(w, h, degrees).ok_or(degenerate)?;
                warp::warp(input, &forward.invert())?
            }
            Transform::Zoom { factor } => {
                let forward = warp::zoom(w, h, factor).ok_or(degenerate)?;
                warp::warp(input, &forward.invert())?
            }
            Transform::Perspective { corners } => {
                let to_source = warp::perspective_to_source(w, h, corners).ok_or(degenerate)?;
                warp::warp(input, &to_source)?
            }
            Transform::FlipHorizontal => flip_horizontal(input)?,
            Transform::FlipVertical => flip_vertical(input)?,
            Transform::Brightness { factor } => {
                let factor = factor.max(0.0) as f32;
                map_color_samples(input, |s| clamp_sample(s as f32 * factor))?
            }
            Transform::GaussianBlur { kernel_size, sigma } => {
                gaussian_blur(input, kernel_size, sigma)?
            }
            Transform::GaussianNoise { std_dev, seed } => gaussian_noise(input, std_dev, seed)?,
            Transform::HueSaturation {
                hue_shift,
                saturation_shift,
            } => hue_saturation(input, hue_shift, saturation_shift)?,
        };

        trace!("applied {transform:?} to {w}x{h}");
        Ok(output)
    }
}

fn flip_horizontal(input: &PixelBuffer) -> Result<PixelBuffer, BufferError> {
    let channels = input.channels() as usize;
    let mut out = Vec::with_capacity(input.as_bytes().len());
    for row in input.as_bytes().chunks_exact(input.stride()) {
        for px in row.chunks_exact(channels).rev() {
            out.extend_from_slice(px);
        }
    }
    input.with_same_shape(out)
}

fn flip_vertical(input: &PixelBuffer) -> Result<PixelBuffer, BufferError> {
    let out = input
        .as_bytes()
        .chunks_exact(input.stride())
        .rev()
        .flatten()
        .copied()
        .collect();
    input.with_same_shape(out)
}

/// Apply `f` to every colour sample, leaving alpha alone.
fn map_color_samples(
    input: &PixelBuffer,
    f: impl Fn(u8) -> u8 + Sync,
) -> Result<PixelBuffer, BufferError> {
    let channels = input.channels() as usize;
    let color = input.color_channels();
    let mut out = input.as_bytes().to_vec();
    out.par_chunks_mut(input.stride()).for_each(|row| {
        for px in row.chunks_exact_mut(channels) {
            for sample in &mut px[..color] {
                *sample = f(*sample);
            }
        }
    });
    input.with_same_shape(out)
}

fn gaussian_blur(
    input: &PixelBuffer,
    kernel_size: u32,
    sigma: f64,
) -> Result<PixelBuffer, BufferError> {
    let kernel = gaussian_kernel(kernel_size, sigma);
    let radius = kernel.len() / 2;
    let (width, height) = (input.width() as usize, input.height() as usize);
    let channels = input.channels() as usize;
    let stride = input.stride();
    let src = input.as_bytes();

    // Horizontal pass, kept in f32 to avoid double rounding.
    let mut horizontal = vec![0f32; src.len()];
    horizontal
        .par_chunks_mut(stride)
        .zip(src.par_chunks(stride))
        .for_each(|(dst, row)| {
            for x in 0..width {
                for c in 0..channels {
                    dst[x * channels + c] = kernel
                        .iter()
                        .enumerate()
                        .map(|(k, weight)| {
                            let sx = (x + k).saturating_sub(radius).min(width - 1);
                            weight * row[sx * channels + c] as f32
                        })
                        .sum();
                }
            }
        });

    let mut out = vec![0u8; src.len()];
    out.par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, dst)| {
            for (i, sample) in dst.iter_mut().enumerate() {
                let acc: f32 = kernel
                    .iter()
                    .enumerate()
                    .map(|(k, weight)| {
                        let sy = (y + k).saturating_sub(radius).min(height - 1);
                        weight * horizontal[sy * stride + i]
                    })
                    .sum();
                *sample = clamp_sample(acc);
            }
        });

    input.with_same_shape(out)
}

/// The colour samples are laid out as one gray plane, `width × colour
/// channels` wide, so alpha never receives noise.
fn gaussian_noise(input: &PixelBuffer, std_dev: f64, seed: u64) -> Result<PixelBuffer, ExecError> {
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(ExecError::InvalidNoise(std_dev));
    }
    let channels = input.channels() as usize;
    let color = input.color_channels();
    let plane = GrayImage::from_fn(input.width() * color as u32, input.height(), |x, y| {
        let c = color as u32;
        Luma([input.pixel(x / c, y)[(x % c) as usize]])
    });
    let noisy = imageproc::noise::gaussian_noise(&plane, 0.0, std_dev, seed);

    let mut out = input.as_bytes().to_vec();
    for (px, samples) in out
        .chunks_exact_mut(channels)
        .zip(noisy.as_raw().chunks_exact(color))
    {
        px[..color].copy_from_slice(samples);
    }
    Ok(input.with_same_shape(out)?)
}

fn hue_saturation(
    input: &PixelBuffer,
    hue_shift: f64,
    saturation_shift: f64,
) -> Result<PixelBuffer, BufferError> {
    if input.channels() < 3 {
        return Ok(input.clone());
    }
    let channels = input.channels() as usize;
    let hue_degrees = (hue_shift * DEGREES_PER_HUE_UNIT) as f32;
    let saturation_delta = (saturation_shift / 255.0) as f32;
    let mut out = input.as_bytes().to_vec();

    out.par_chunks_mut(input.stride()).for_each(|row| {
        for px in row.chunks_exact_mut(channels) {
            let (h, s, v) = rgb_to_hsv(px[0] as f32, px[1] as f32, px[2] as f32);
            let (r, g, b) = hsv_to_rgb(
                h + hue_degrees,
                (s + saturation_delta).clamp(0.0, 1.0),
                (v + VALUE_SHIFT).clamp(0.0, 255.0),
            );
            px[0] = clamp_sample(r);
            px[1] = clamp_sample(g);
            px[2] = clamp_sample(b);
        }
    });

    input.with_same_shape(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::UNIT_SQUARE;
    use crate::test_helpers::{assert_same_shape, gradient_buffer};

    fn apply(input: &PixelBuffer, transform: Transform) -> PixelBuffer {
        RustExecutor::new().apply(input, &transform).unwrap()
    }

    #[test]
    fn flip_horizontal_mirrors_columns() {
        let src = PixelBuffer::new(3, 1, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(apply(&src, Transform::FlipHorizontal).as_bytes(), &[3, 2, 1]);
    }

    #[test]
    fn flip_vertical_mirrors_rows() {
        let src = PixelBuffer::new(1, 3, 1, vec![1, 2, 3]).unwrap();
        assert_eq!(apply(&src, Transform::FlipVertical).as_bytes(), &[3, 2, 1]);
    }

    #[test]
    fn flips_are_involutions() {
        let src = gradient_buffer(7, 5);
        for flip in [Transform::FlipHorizontal, Transform::FlipVertical] {
            let once = apply(&src, flip);
            assert_ne!(once, src);
            assert_eq!(apply(&once, flip), src);
        }
    }

    #[test]
    fn identity_transforms_copy_input() {
        let src = gradient_buffer(6, 4);
        for t in [
            Transform::Rotate { degrees: 0.0 },
            Transform::Zoom { factor: 1.0 },
            Transform::Shear { degrees: 0.0 },
            Transform::Brightness { factor: 1.0 },
            Transform::Perspective {
                corners: UNIT_SQUARE,
            },
        ] {
            assert_eq!(apply(&src, t), src, "{t:?}");
        }
    }

    #[test]
    fn input_is_not_mutated() {
        let src = gradient_buffer(5, 5);
        let before = src.clone();
        let _ = apply(&src, Transform::Rotate { degrees: 33.0 });
        let _ = apply(&src, Transform::Brightness { factor: 1.7 });
        assert_eq!(src, before);
    }

    #[test]
    fn geometric_transforms_keep_canvas() {
        let src = gradient_buffer(13, 7);
        for t in [
            Transform::Rotate { degrees: 45.0 },
            Transform::Shear { degrees: -20.0 },
            Transform::Zoom { factor: 1.3 },
            Transform::Perspective {
                corners: [[0.2, 0.1], [0.9, 0.0], [1.0, 0.8], [0.1, 0.95]],
            },
        ] {
            assert_same_shape(&apply(&src, t), &src);
        }
    }

    #[test]
    fn rotation_corners_use_zero_fill() {
        let src = PixelBuffer::filled(20, 20, &[250, 250, 250]).unwrap();
        let out = apply(&src, Transform::Rotate { degrees: 45.0 });
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(out.pixel(10, 10), &[250, 250, 250]);
    }

    #[test]
    fn zero_zoom_factor_is_degenerate() {
        let src = gradient_buffer(4, 4);
        let err = RustExecutor::new()
            .apply(&src, &Transform::Zoom { factor: 0.0 })
            .unwrap_err();
        assert!(matches!(err, ExecError::DegenerateProjection { .. }));
    }

    #[test]
    fn brightness_scales_and_clamps() {
        let src = PixelBuffer::new(2, 1, 3, vec![10, 100, 200, 0, 128, 255]).unwrap();
        let out = apply(&src, Transform::Brightness { factor: 1.5 });
        assert_eq!(out.as_bytes(), &[15, 150, 255, 0, 192, 255]);
        let dark = apply(&src, Transform::Brightness { factor: 0.0 });
        assert!(dark.as_bytes().iter().all(|&s| s == 0));
    }

    #[test]
    fn brightness_keeps_alpha() {
        let src = PixelBuffer::filled(2, 2, &[100, 100, 100, 77]).unwrap();
        let out = apply(&src, Transform::Brightness { factor: 2.0 });
        assert_eq!(out.pixel(1, 1), &[200, 200, 200, 77]);
    }

    #[test]
    fn blur_keeps_flat_image_flat() {
        let src = PixelBuffer::filled(9, 9, &[200, 40, 90]).unwrap();
        let out = apply(
            &src,
            Transform::GaussianBlur {
                kernel_size: 7,
                sigma: 1.4,
            },
        );
        assert_eq!(out, src);
    }

    #[test]
    fn blur_spreads_an_impulse() {
        let mut data = vec![0u8; 25];
        data[12] = 255;
        let src = PixelBuffer::new(5, 5, 1, data).unwrap();
        let out = apply(
            &src,
            Transform::GaussianBlur {
                kernel_size: 3,
                sigma: 0.8,
            },
        );
        let centre = out.pixel(2, 2)[0];
        let neighbour = out.pixel(1, 2)[0];
        assert!(centre < 255 && centre > neighbour && neighbour > 0);
        assert_eq!(out.pixel(0, 0), &[0]);
    }

    #[test]
    fn noise_is_reproducible_per_seed() {
        let src = gradient_buffer(16, 16);
        let t = Transform::GaussianNoise {
            std_dev: 8.0,
            seed: 42,
        };
        assert_eq!(apply(&src, t), apply(&src, t));
        let other = apply(
            &src,
            Transform::GaussianNoise {
                std_dev: 8.0,
                seed: 43,
            },
        );
        assert_ne!(apply(&src, t), other);
    }

    #[test]
    fn noise_perturbs_extreme_samples() {
        let src = PixelBuffer::new(8, 8, 1, [0u8, 255].repeat(32)).unwrap();
        let out = apply(
            &src,
            Transform::GaussianNoise {
                std_dev: 10.0,
                seed: 1,
            },
        );
        assert_same_shape(&out, &src);
        assert_ne!(out, src);
    }

    #[test]
    fn noise_keeps_alpha() {
        let src = PixelBuffer::filled(4, 4, &[128, 128, 128, 9]).unwrap();
        let out = apply(
            &src,
            Transform::GaussianNoise {
                std_dev: 30.0,
                seed: 5,
            },
        );
        assert!(out.as_bytes().chunks_exact(4).all(|px| px[3] == 9));
    }

    #[test]
    fn negative_noise_deviation_is_rejected() {
        let src = gradient_buffer(4, 4);
        let err = RustExecutor::new()
            .apply(
                &src,
                &Transform::GaussianNoise {
                    std_dev: -1.0,
                    seed: 0,
                },
            )
            .unwrap_err();
        assert_eq!(err, ExecError::InvalidNoise(-1.0));
    }

    #[test]
    fn hue_shift_rotates_primaries() {
        let red = PixelBuffer::filled(2, 2, &[255, 0, 0]).unwrap();
        // 60 OpenCV units = 120 degrees: red → green.
        let out = apply(
            &red,
            Transform::HueSaturation {
                hue_shift: 60.0,
                saturation_shift: 0.0,
            },
        );
        assert_eq!(out.pixel(0, 0), &[0, 255, 0]);
    }

    #[test]
    fn full_desaturation_gives_gray() {
        let red = PixelBuffer::filled(1, 1, &[255, 0, 0]).unwrap();
        let out = apply(
            &red,
            Transform::HueSaturation {
                hue_shift: 0.0,
                saturation_shift: -255.0,
            },
        );
        assert_eq!(out.pixel(0, 0), &[255, 255, 255]);
    }

    #[test]
    fn hue_saturation_on_grayscale_is_copy() {
        let gray = PixelBuffer::new(2, 1, 1, vec![10, 20]).unwrap();
        let out = apply(
            &gray,
            Transform::HueSaturation {
                hue_shift: 30.0,
                saturation_shift: 30.0,
            },
        );
        assert_eq!(out, gray);
    }
}
