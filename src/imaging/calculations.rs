//! Pure numeric helpers for the executor and the factory.
//!
//! Nothing here touches pixels or randomness, so everything is unit testable
//! on plain numbers.

/// Odd kernel sizes available for a blur limit.
///
/// The upper bound is the largest odd value ≤ `limit` (an even limit is
/// rounded down), the lower bound is 3 unless the limit itself is smaller.
///
/// # Examples
/// ```
/// # use pixel_augment::imaging::calculations::blur_kernel_sizes;
/// assert_eq!(blur_kernel_sizes(7), vec![3, 5, 7]);
/// assert_eq!(blur_kernel_sizes(8), vec![3, 5, 7]);
/// assert_eq!(blur_kernel_sizes(1), vec![1]);
/// ```
pub fn blur_kernel_sizes(limit: u32) -> Vec<u32> {
    let hi = if limit % 2 == 0 {
        limit.saturating_sub(1).max(1)
    } else {
        limit
    };
    let lo = hi.min(3);
    (lo..=hi).step_by(2).collect()
}

/// Gaussian sigma for a kernel size, using the OpenCV convention
/// `0.3 * ((k - 1) * 0.5 - 1) + 0.8`.
pub fn sigma_for_kernel(kernel_size: u32) -> f64 {
    0.3 * ((kernel_size as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian weights of length `kernel_size`.
pub fn gaussian_kernel(kernel_size: u32, sigma: f64) -> Vec<f32> {
    let radius = (kernel_size / 2) as i64;
    let denom = 2.0 * sigma * sigma;
    let raw: Vec<f64> = (-radius..=radius)
        .map(|i| (-((i * i) as f64) / denom).exp())
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Round and clamp into the sample range.
#[inline]
pub fn clamp_sample(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// RGB (0–255) → HSV with hue in degrees [0, 360), saturation in [0, 1] and
/// value in 0–255.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    let saturation = if max == 0.0 { 0.0 } else { delta / max };
    (hue, saturation, max)
}

/// Inverse of [`rgb_to_hsv`].
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let h = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    (r + m, g + m, b + m)
}

/// Zoom factor bounds for a zoom percentage: a range centred on 1 that
/// reaches `|zoom| / 100` to either side. The sign of `zoom` does not matter.
///
/// # Examples
/// ```
/// # use pixel_augment::imaging::calculations::zoom_bounds;
/// assert_eq!(zoom_bounds(20.0), (0.8, 1.2));
/// assert_eq!(zoom_bounds(-20.0), (0.8, 1.2));
/// ```
pub fn zoom_bounds(zoom_percent: f64) -> (f64, f64) {
    let limit = zoom_percent.abs() / 100.0;
    (1.0 - limit, 1.0 + limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_sizes_are_odd_and_bounded() {
        for limit in 1..=15 {
            let sizes = blur_kernel_sizes(limit);
            assert!(!sizes.is_empty(), "limit {limit}");
            assert!(sizes.iter().all(|k| k % 2 == 1 && *k <= limit.max(1)));
        }
        assert_eq!(blur_kernel_sizes(2), vec![1]);
        assert_eq!(blur_kernel_sizes(3), vec![3]);
        assert_eq!(blur_kernel_sizes(15), vec![3, 5, 7, 9, 11, 13, 15]);
    }

    #[test]
    fn sigma_follows_opencv_convention() {
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-12);
        assert!((sigma_for_kernel(5) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(7, sigma_for_kernel(7));
        assert_eq!(k.len(), 7);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..3 {
            assert!((k[i] - k[6 - i]).abs() < 1e-7);
        }
        assert!(k[3] > k[2]);
    }

    #[test]
    fn single_tap_kernel_is_unit() {
        assert_eq!(gaussian_kernel(1, 0.5), vec![1.0]);
    }

    #[test]
    fn clamp_sample_saturates() {
        assert_eq!(clamp_sample(-3.0), 0);
        assert_eq!(clamp_sample(127.5), 128);
        assert_eq!(clamp_sample(300.0), 255);
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(rgb_to_hsv(255.0, 0.0, 0.0), (0.0, 1.0, 255.0));
        assert_eq!(rgb_to_hsv(0.0, 255.0, 0.0), (120.0, 1.0, 255.0));
        assert_eq!(rgb_to_hsv(0.0, 0.0, 255.0), (240.0, 1.0, 255.0));
        assert_eq!(rgb_to_hsv(80.0, 80.0, 80.0), (0.0, 0.0, 80.0));
    }

    #[test]
    fn hsv_roundtrip_within_rounding() {
        for &(r, g, b) in &[(12.0, 200.0, 99.0), (255.0, 128.0, 0.0), (3.0, 3.0, 250.0)] {
            let (h, s, v) = rgb_to_hsv(r, g, b);
            let (r2, g2, b2) = hsv_to_rgb(h, s, v);
            assert_eq!(
                (clamp_sample(r2), clamp_sample(g2), clamp_sample(b2)),
                (r as u8, g as u8, b as u8)
            );
        }
    }

    #[test]
    fn hue_wraps_around() {
        let (r, g, b) = hsv_to_rgb(360.0 + 120.0, 1.0, 255.0);
        assert_eq!((clamp_sample(r), clamp_sample(g), clamp_sample(b)), (0, 255, 0));
    }

    #[test]
    fn zoom_bounds_straddle_one() {
        assert_eq!(zoom_bounds(0.0), (1.0, 1.0));
        assert_eq!(zoom_bounds(50.0), (0.5, 1.5));
        assert_eq!(zoom_bounds(-50.0), (0.5, 1.5));
    }
}
