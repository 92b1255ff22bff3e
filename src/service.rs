//! The augmentation pipeline: decode → validate → build → execute → encode.
//!
//! [`AugmentationService`] owns no transform logic of its own. It wires the
//! codec, registry, factory and an [`Executor`] together and stops at the
//! first failing stage, so an invalid request never reaches the executor.

use crate::codec::{self, CodecError, OutputFormat};
use crate::factory::build_transform;
use crate::imaging::{ExecError, Executor, RustExecutor};
use crate::registry::{self, RawParams, ValidationError};
use crate::types::{PixelBuffer, TransformKind, TransformResult, UnsupportedKind};
use log::{debug, info};
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
    #[error("Invalid parameters: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    UnsupportedKind(#[from] UnsupportedKind),
    #[error("Transform failed: {0}")]
    Execution(#[from] ExecError),
}

impl EngineError {
    /// Name of the offending parameter, for validation failures.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            EngineError::Validation(e) => Some(e.parameter()),
            _ => None,
        }
    }
}

/// Runs single augmentations end to end.
///
/// Generic over the executor so tests can record what would be applied.
pub struct AugmentationService<E: Executor = RustExecutor> {
    executor: E,
}

impl AugmentationService<RustExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RustExecutor::new())
    }
}

impl Default for AugmentationService<RustExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> AugmentationService<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Validate, build and apply one transform to an in-memory buffer.
    pub fn augment<R: Rng>(
        &self,
        input: &PixelBuffer,
        kind: TransformKind,
        params: &RawParams,
        rng: &mut R,
    ) -> Result<TransformResult, EngineError> {
        let request = registry::validate(kind, params)?;
        debug!("validated {kind} request: {:?}", request.params());

        let transform = build_transform(&request, rng);
        debug!("built {transform:?}");

        let buffer = self.executor.apply(input, &transform)?;
        debug!(
            "applied {kind} to {}x{}x{}",
            input.width(),
            input.height(),
            input.channels()
        );

        Ok(TransformResult { buffer, kind })
    }

    /// Full byte-level pipeline. Returns PNG bytes.
    pub fn run<R: Rng>(
        &self,
        bytes: &[u8],
        kind: TransformKind,
        params: &RawParams,
        rng: &mut R,
    ) -> Result<Vec<u8>, EngineError> {
        let input = codec::decode(bytes)?;
        debug!("decoded {}x{} input", input.width(), input.height());

        let result = self.augment(&input, kind, params, rng)?;
        let encoded = codec::encode(&result.buffer, OutputFormat::Png)?;
        info!(
            "{kind}: {} input bytes -> {} PNG bytes",
            bytes.len(),
            encoded.len()
        );
        Ok(encoded)
    }

    /// [`run`](Self::run) with the kind given by name.
    pub fn run_named<R: Rng>(
        &self,
        bytes: &[u8],
        kind: &str,
        params: &RawParams,
        rng: &mut R,
    ) -> Result<Vec<u8>, EngineError> {
        let kind: TransformKind = kind.parse()?;
        self.run(bytes, kind, params, rng)
    }
}
