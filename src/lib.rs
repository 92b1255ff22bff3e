//! # Pixel Augment
//!
//! A single-image augmentation engine. Pick one transform kind from a fixed
//! catalog, tune its numeric parameters, apply it to a JPEG or PNG, and get a
//! PNG back.
//!
//! # Architecture: Five-Stage Pipeline
//!
//! Every request passes through the same stages, and the first failure stops
//! it:
//!
//! ```text
//! 1. Decode    bytes               →  PixelBuffer            (codec)
//! 2. Validate  kind + raw params   →  AugmentationRequest    (registry)
//! 3. Build     request + rng       →  Transform              (factory)
//! 4. Execute   buffer + transform  →  PixelBuffer            (imaging)
//! 5. Encode    PixelBuffer         →  PNG bytes              (codec)
//! ```
//!
//! [`service::AugmentationService`] wires the stages together.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`codec`] | JPEG/PNG decoding to RGB, PNG/JPEG encoding |
//! | [`registry`] | Per-kind parameter declarations and the validation gate |
//! | [`factory`] | Samples a concrete [`imaging::Transform`] from a validated request |
//! | [`imaging`] | [`imaging::Executor`] trait and the pure-Rust executor |
//! | [`service`] | The pipeline and its unified [`service::EngineError`] |
//! | [`types`] | [`types::PixelBuffer`], [`types::TransformKind`], [`types::TransformResult`] |
//! | [`config`] | `augment.toml` loading, validation and merging for the CLI |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Validate Once, Into Types
//!
//! Raw parameters arrive as a name → number map. [`registry::validate`] is the
//! only constructor of [`registry::AugmentationRequest`], and the request
//! carries a per-kind enum ([`registry::KindParams`]). The factory and
//! executor match on closed enums and never look up a parameter by name.
//!
//! ## Randomness Is an Argument
//!
//! The factory takes `&mut impl Rng` and is the only code that draws random
//! numbers. Noise carries its own seed inside the [`imaging::Transform`], so
//! executing a transform is a pure function of buffer and transform. The CLI
//! seeds a `StdRng` per run and prints the seed.
//!
//! ## One Buffer Type
//!
//! [`types::PixelBuffer`] is used from decode to encode. Conversion to the
//! `image` crate's types happens inside [`codec`], plus a short-lived gray
//! plane handed to `imageproc` for noise.
//!
//! ## Fixed Canvas, Zero Border
//!
//! Rotation, shear, zoom and perspective keep the input dimensions. Output
//! pixels whose source lies outside the image are zero.

pub mod codec;
pub mod config;
pub mod factory;
pub mod imaging;
pub mod output;
pub mod registry;
pub mod service;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
