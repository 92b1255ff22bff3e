//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Kinds
//!
//! ```text
//! Transform kinds
//! 001 Rotation (rotation)
//!     angle: float in [-180, 180], default 0 (Rotation Angle)
//! 002 Flip Horizontal (flip-horizontal)
//!     no parameters
//! ```
//!
//! ## Apply
//!
//! ```text
//! Rotation
//!     angle = 30
//!     Seed: 42
//!     Output: augmented_rotation.png (18133 bytes)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::registry::{ParamSpec, ParameterSpec, RawParams};
use crate::types::TransformKind;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// One parameter declaration on a single line.
///
/// ```text
/// blur: integer in [1, 15], default 3 (Blur Intensity)
/// ```
fn param_line(param: &ParamSpec) -> String {
    format!(
        "{}: {} in [{}, {}], default {} ({})",
        param.name,
        param.ty.name(),
        param.min,
        param.max,
        param.default_value(),
        param.label
    )
}

// ============================================================================
// Kinds
// ============================================================================

/// Format the catalog as an indexed listing.
pub fn format_catalog(specs: &[ParameterSpec]) -> Vec<String> {
    let mut lines = vec!["Transform kinds".to_string()];
    for (i, spec) in specs.iter().enumerate() {
        lines.push(format!(
            "{} {} ({})",
            format_index(i + 1),
            spec.kind.label(),
            spec.kind.slug()
        ));
        if spec.params.is_empty() {
            lines.push(format!("{}no parameters", indent(1)));
        }
        for param in spec.params {
            lines.push(format!("{}{}", indent(1), param_line(param)));
        }
    }
    lines
}

/// Format the catalog as pretty-printed JSON.
pub fn format_catalog_json(specs: &[ParameterSpec]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(specs)
}

/// Print the catalog to stdout.
pub fn print_catalog(specs: &[ParameterSpec]) {
    for line in format_catalog(specs) {
        println!("{}", line);
    }
}

// ============================================================================
// Apply
// ============================================================================

/// Format the result of one `apply` run.
pub fn format_apply_summary(
    kind: TransformKind,
    params: &RawParams,
    seed: u64,
    output: &Path,
    byte_count: usize,
) -> Vec<String> {
    let mut lines = vec![kind.label().to_string()];
    for (name, value) in params {
        lines.push(format!("{}{} = {}", indent(1), name, value));
    }
    if kind.is_stochastic() {
        lines.push(format!("{}Seed: {}", indent(1), seed));
    }
    lines.push(format!(
        "{}Output: {} ({} bytes)",
        indent(1),
        output.display(),
        byte_count
    ));
    lines
}

/// Print the result of one `apply` run to stdout.
pub fn print_apply_summary(
    kind: TransformKind,
    params: &RawParams,
    seed: u64,
    output: &Path,
    byte_count: usize,
) {
    for line in format_apply_summary(kind, params, seed, output, byte_count) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
