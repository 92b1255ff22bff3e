//! Projective resampling for the geometric transforms.
//!
//! Each builder returns the *forward* map in continuous pixel coordinates
//! (origin at the top-left corner of the top-left pixel, y down). [`warp`]
//! takes the inverse, output → source, and samples every output pixel centre
//! bilinearly.
//!
//! Border-fill policy: output pixels whose source position falls outside
//! the image are left at zero (black, and transparent for RGBA).
//!
//! `imageproc` supplies the projection algebra but not the sampling: its
//! bilinear `warp` needs both neighbours of a sample inside the image, so the
//! last row and column fall back to the fill colour even under an identity
//! projection. Here positions within half a pixel of the edge are clamped
//! onto it, which keeps rotation 0 and zoom 1 exact copies.

use super::calculations::clamp_sample;
use crate::types::{BufferError, PixelBuffer};
use imageproc::geometric_transformations::Projection;
use rayon::prelude::*;

fn centre(width: u32, height: u32) -> (f32, f32) {
    (width as f32 / 2.0, height as f32 / 2.0)
}

/// Conjugate `inner` so it acts about the image centre.
fn about_centre(width: u32, height: u32, inner: Projection) -> Projection {
    let (cx, cy) = centre(width, height);
    Projection::translate(cx, cy) * inner * Projection::translate(-cx, -cy)
}

/// Clockwise rotation by `degrees` about the centre.
pub fn rotation(width: u32, height: u32, degrees: f64) -> Projection {
    about_centre(
        width,
        height,
        Projection::rotate((degrees as f32).to_radians()),
    )
}

/// Horizontal shear by `degrees` about the centre: `x' = x + tan(θ)·y`.
pub fn shear(width: u32, height: u32, degrees: f64) -> Option<Projection> {
    let k = degrees.to_radians().tan() as f32;
    let inner = Projection::from_matrix([1.0, k, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0])?;
    Some(about_centre(width, height, inner))
}

/// Uniform scale about the centre. `None` for a non-positive factor.
pub fn zoom(width: u32, height: u32, factor: f64) -> Option<Projection> {
    if !(factor > 0.0) {
        return None;
    }
    let f = factor as f32;
    Some(about_centre(width, height, Projection::scale(f, f)))
}

/// Output → source map that stretches the quadrilateral `corners`
/// (fractions of width/height, clockwise from top-left) onto the canvas.
pub fn perspective_to_source(width: u32, height: u32, corners: [[f64; 2]; 4]) -> Option<Projection> {
    let (w, h) = (width as f32, height as f32);
    let canvas = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let quad = corners.map(|[x, y]| (x as f32 * w, y as f32 * h));
    Projection::from_control_points(canvas, quad)
}

/// Resample `src` through `to_source` (output → source) into a new buffer
/// of the same shape.
pub fn warp(src: &PixelBuffer, to_source: &Projection) -> Result<PixelBuffer, BufferError> {
    let channels = src.channels() as usize;
    let mut out = vec![0u8; src.as_bytes().len()];

    out.par_chunks_mut(src.stride())
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                let (sx, sy) = *to_source * (x as f32 + 0.5, y as f32 + 0.5);
                sample_bilinear(src, sx - 0.5, sy - 0.5, px);
            }
        });

    src.with_same_shape(out)
}

/// Bilinear sample at pixel-index coordinates `(x, y)`.
///
/// Positions within half a pixel of the image are clamped onto it; anything
/// further out (or NaN) leaves `out` untouched.
fn sample_bilinear(src: &PixelBuffer, x: f32, y: f32, out: &mut [u8]) {
    let (w, h) = (src.width() as f32, src.height() as f32);
    let inside = x >= -0.5 && x < w - 0.5 && y >= -0.5 && y < h - 0.5;
    if !inside {
        return;
    }

    let x = x.clamp(0.0, w - 1.0);
    let y = y.clamp(0.0, h - 1.0);
    let (x0, y0) = (x.floor() as u32, y.floor() as u32);
    let x1 = (x0 + 1).min(src.width() - 1);
    let y1 = (y0 + 1).min(src.height() - 1);
    let (fx, fy) = (x - x0 as f32, y - y0 as f32);

    let p00 = src.pixel(x0, y0);
    let p10 = src.pixel(x1, y0);
    let p01 = src.pixel(x0, y1);
    let p11 = src.pixel(x1, y1);

    for (i, sample) in out.iter_mut().enumerate() {
        let top = p00[i] as f32 * (1.0 - fx) + p10[i] as f32 * fx;
        let bottom = p01[i] as f32 * (1.0 - fx) + p11[i] as f32 * fx;
        *sample = clamp_sample(top * (1.0 - fy) + bottom * fy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::gradient_buffer;

    /// Red is `4·x`, green is `4·y`, blue is zero. Bilinear sampling of a
    /// linear ramp is exact, so source positions can be read back from the
    /// output samples.
    fn ramp(width: u32, height: u32) -> PixelBuffer {
        let data = (0..height)
            .flat_map(|y| (0..width).flat_map(move |x| [(4 * x) as u8, (4 * y) as u8, 0]))
            .collect();
        PixelBuffer::new(width, height, 3, data).unwrap()
    }

    #[test]
    fn zero_rotation_warp_is_exact() {
        let src = gradient_buffer(9, 6);
        let out = warp(&src, &rotation(9, 6, 0.0).invert()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn unit_zoom_warp_is_exact() {
        let src = gradient_buffer(8, 5);
        let out = warp(&src, &zoom(8, 5, 1.0).unwrap().invert()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn zoom_rejects_non_positive_factor() {
        assert!(zoom(4, 4, 0.0).is_none());
        assert!(zoom(4, 4, f64::NAN).is_none());
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        let src = PixelBuffer::new(3, 3, 1, (1..=9).collect()).unwrap();
        let out = warp(&src, &rotation(3, 3, 90.0).invert()).unwrap();
        // 1 2 3      7 4 1
        // 4 5 6  ->  8 5 2
        // 7 8 9      9 6 3
        assert_eq!(out.as_bytes(), &[7, 4, 1, 8, 5, 2, 9, 6, 3]);
    }

    #[test]
    fn zoom_out_fills_border_with_zero() {
        let src = PixelBuffer::filled(8, 8, &[200, 100, 50]).unwrap();
        let out = warp(&src, &zoom(8, 8, 0.5).unwrap().invert()).unwrap();
        assert_eq!(out.pixel(0, 0), &[0, 0, 0]);
        assert_eq!(out.pixel(7, 7), &[0, 0, 0]);
        assert_eq!(out.pixel(4, 4), &[200, 100, 50]);
    }

    #[test]
    fn shear_keeps_centre_row() {
        let src = gradient_buffer(10, 10);
        let out = warp(&src, &shear(10, 10, 30.0).unwrap().invert()).unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
        // Far corners are pushed off the canvas.
        assert_eq!(out.pixel(0, 9), &[0, 0, 0]);
    }

    #[test]
    fn shear_shifts_rows_by_tangent_of_offset() {
        let src = ramp(32, 32);
        // tan(45°) = 1, centre row at y = 16. Row 20 samples (pixel centre
        // 20.5) are taken 4.5 pixels to the left; row 11 samples 4.5 to the right.
        let out = warp(&src, &shear(32, 32, 45.0).unwrap().invert()).unwrap();
        for x in 5..32 {
            let px = out.pixel(x, 20);
            assert!(px[0].abs_diff((4 * x - 18) as u8) <= 1, "x {x}: {px:?}");
            assert_eq!(px[1], 80);
        }
        for x in 0..4 {
            assert_eq!(out.pixel(x, 20), &[0, 0, 0], "x {x}");
        }
        for x in 0..27 {
            let px = out.pixel(x, 11);
            assert!(px[0].abs_diff((4 * x + 18) as u8) <= 1, "x {x}: {px:?}");
            assert_eq!(px[1], 44);
        }
    }

    #[test]
    fn perspective_centre_quad_fills_canvas() {
        let src = ramp(32, 32);
        let corners = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]];
        let out = warp(&src, &perspective_to_source(32, 32, corners).unwrap()).unwrap();
        // Output pixel (0, 0) lands next to source pixel (w/4, h/4).
        let origin = out.pixel(0, 0);
        let quarter = src.pixel(8, 8);
        assert!(origin[0].abs_diff(quarter[0]) <= 2, "{origin:?} vs {quarter:?}");
        assert!(origin[1].abs_diff(quarter[1]) <= 2, "{origin:?} vs {quarter:?}");
        // The middle half is stretched 2x: output x reads source 7.75 + x/2.
        for (x, y) in [(0, 0), (10, 3), (31, 31), (17, 25)] {
            let px = out.pixel(x, y);
            assert!(px[0].abs_diff((31 + 2 * x) as u8) <= 1, "({x}, {y}): {px:?}");
            assert!(px[1].abs_diff((31 + 2 * y) as u8) <= 1, "({x}, {y}): {px:?}");
        }
    }

    #[test]
    fn perspective_unit_square_is_near_identity() {
        let src = gradient_buffer(12, 12);
        let to_source =
            perspective_to_source(12, 12, [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
                .unwrap();
        let out = warp(&src, &to_source).unwrap();
        for (a, b) in out.as_bytes().iter().zip(src.as_bytes()) {
            assert!(a.abs_diff(*b) <= 1);
        }
    }

    #[test]
    fn perspective_inset_keeps_shape() {
        let src = gradient_buffer(16, 10);
        let corners = [[0.1, 0.05], [0.9, 0.0], [0.95, 0.9], [0.0, 1.0]];
        let out = warp(&src, &perspective_to_source(16, 10, corners).unwrap()).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (16, 10, 3));
    }
}
