//! Shared test utilities for the pixel-augment test suite.
//!
//! Provides synthetic buffers, encoded fixtures, parameter-map builders and
//! seeded randomness, so unit tests never depend on image files on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let input = png_bytes(&gradient_buffer(8, 8));
//! let params = raw(&[("angle", ParamValue::Integer(30))]);
//! let mut rng = seeded_rng(7);
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::codec::{OutputFormat, encode};
use crate::registry::{ParamValue, RawParams};
use crate::types::PixelBuffer;

// =========================================================================
// Buffers
// =========================================================================

/// RGB buffer with distinct, smoothly varying samples: red follows x, green
/// follows y, blue their sum.
pub fn gradient_buffer(width: u32, height: u32) -> PixelBuffer {
    let (x_span, y_span) = (width.saturating_sub(1).max(1), height.saturating_sub(1).max(1));
    let mut data = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / x_span) as u8);
            data.push((y * 255 / y_span) as u8);
            data.push(((x + y) * 7 % 256) as u8);
        }
    }
    PixelBuffer::new(width, height, 3, data).unwrap()
}

/// Encode `buffer` as PNG bytes.
pub fn png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    encode(buffer, OutputFormat::Png).unwrap()
}

// =========================================================================
// Parameters and randomness
// =========================================================================

/// Build a parameter map from `(name, value)` pairs.
pub fn raw(pairs: &[(&str, ParamValue)]) -> RawParams {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), *value))
        .collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert two buffers share width, height and channel count.
pub fn assert_same_shape(actual: &PixelBuffer, expected: &PixelBuffer) {
    assert_eq!(
        (actual.width(), actual.height(), actual.channels()),
        (expected.width(), expected.height(), expected.channels()),
        "buffer shape changed"
    );
}
