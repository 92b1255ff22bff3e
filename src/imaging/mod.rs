//! Pixel work: concrete transforms and the executor that applies them.
//!
//! | Transform | Approach |
//! |---|---|
//! | **Rotate / Shear / Zoom** | affine `imageproc` projection + bilinear warp |
//! | **Perspective** | four-point projection + bilinear warp |
//! | **Flips** | lossless row / column reversal |
//! | **Brightness / Noise / Hue & Saturation** | per-sample maps over colour channels, noise via `imageproc` |
//! | **Gaussian blur** | separable convolution |
//!
//! The module is split into:
//! - **Calculations**: pure numeric helpers (kernel sizes, HSV, zoom bounds)
//! - **Parameters**: [`Transform`], plain data with every random choice made
//! - **Backend**: [`Executor`] trait + [`RustExecutor`]
//! - **Warp**: projection builders and the resampler behind the geometric transforms

pub mod backend;
pub mod calculations;
pub mod params;
pub mod rust_backend;
mod warp;

pub use backend::{ExecError, Executor};
pub use params::Transform;
pub use rust_backend::RustExecutor;
