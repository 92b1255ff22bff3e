//! Executor trait and shared error type.
//!
//! The [`Executor`] trait is the seam between orchestration and pixel work.
//! The production implementation is
//! [`RustExecutor`](super::rust_backend::RustExecutor); tests swap in a
//! recording mock to check what the service asked for without touching
//! pixels.

use super::params::Transform;
use crate::types::{BufferError, PixelBuffer, TransformKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecError {
    #[error("{kind} warp is degenerate and cannot be inverted")]
    DegenerateProjection { kind: TransformKind },
    #[error("Noise standard deviation must be finite and non-negative (got {0})")]
    InvalidNoise(f64),
    #[error("Invalid output buffer: {0}")]
    Buffer(#[from] BufferError),
}

/// Applies concrete transforms to pixel buffers.
///
/// Implementations must never mutate the input and must always return a
/// freshly allocated buffer.
pub trait Executor: Sync {
    fn apply(&self, input: &PixelBuffer, transform: &Transform) -> Result<PixelBuffer, ExecError>;
}
