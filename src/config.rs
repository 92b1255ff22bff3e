//! Command-line configuration.
//!
//! Handles loading, validating and merging `augment.toml`. The engine itself
//! reads no configuration; this file only feeds the CLI, which turns it into
//! explicit arguments (a seed, parameter maps) before calling the service.
//!
//! ## Config File Location
//!
//! The CLI looks for `augment.toml` in the working directory, or reads the
//! file given with `--config`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional
//!
//! [sampling]
//! seed = 42                 # Fixed seed for reproducible output (omit for random)
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//!
//! [params.rotation]         # Presets per transform kind, keyed by slug
//! angle = 30
//!
//! [params.hue-saturation]
//! hue = 10
//! saturation = -20
//! ```
//!
//! ## Partial Configuration
//!
//! Presets are sparse. The file is merged over a stock layer holding the
//! registry defaults for every kind, so parameters a preset leaves out keep
//! their defaults, and `-p name=value` on the command line overrides both.
//!
//! Unknown keys, unknown kind slugs and parameter names a kind does not
//! declare are rejected to catch typos early. Preset values are range-checked
//! when the file is loaded.

use crate::registry::{self, RawParams};
use crate::types::TransformKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "augment.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// CLI configuration loaded from `augment.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AugmentConfig {
    /// Randomness settings.
    pub sampling: SamplingConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
    /// Parameter presets keyed by kind slug.
    pub params: BTreeMap<String, RawParams>,
}

/// Randomness settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplingConfig {
    /// Seed for the per-run generator. When absent, every run draws a fresh
    /// seed from the thread-local generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of rayon workers used by the executor.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

impl AugmentConfig {
    /// Check that every preset names a known kind and passes the registry
    /// once merged over that kind's defaults.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (slug, preset) in &self.params {
            let kind = kind_for_slug(slug).ok_or_else(|| {
                ConfigError::Validation(format!("params.{slug}: unknown transform kind"))
            })?;
            let mut merged = registry::spec_for(kind).defaults();
            merged.extend(preset.iter().map(|(name, value)| (name.clone(), *value)));
            registry::validate(kind, &merged)
                .map_err(|e| ConfigError::Validation(format!("params.{slug}: {e}")))?;
        }
        Ok(())
    }

    /// The preset for `kind`, empty when none is configured.
    pub fn params_for(&self, kind: TransformKind) -> RawParams {
        self.params.get(kind.slug()).cloned().unwrap_or_default()
    }
}

fn kind_for_slug(slug: &str) -> Option<TransformKind> {
    TransformKind::ALL.into_iter().find(|k| k.slug() == slug)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto. It carries a
/// preset for every parameterised kind holding the registry defaults, so a
/// user preset that sets one parameter keeps the defaults for the rest.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    let params = TransformKind::ALL
        .into_iter()
        .map(|kind| (kind.slug().to_string(), registry::spec_for(kind).defaults()))
        .filter(|(_, defaults)| !defaults.is_empty())
        .collect();
    let stock = AugmentConfig {
        params,
        ..AugmentConfig::default()
    };
    Ok(toml::Value::try_from(stock)?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AugmentConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AugmentConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `augment.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<AugmentConfig, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILE_NAME))?;
    resolve_config(stock_defaults_value()?, overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<AugmentConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `augment.toml` listing every kind's
/// parameters at their defaults.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# pixel-augment Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Parameter values shown below are the registry defaults.
#
# Unknown keys, unknown kinds and undeclared parameters cause an error.
# Values passed with `-p name=value` override the presets here.

# ---------------------------------------------------------------------------
# Randomness
# ---------------------------------------------------------------------------
[sampling]
# Fixed seed for reproducible output. Omit for a fresh seed every run.
# seed = 42

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for pixel work.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Parameter presets, one table per transform kind (keyed by slug).
# flip-horizontal and flip-vertical take no parameters.
# ---------------------------------------------------------------------------
[params.rotation]
# Maximum rotation in degrees, sampled in [-angle, angle]. Range -180..180.
angle = 0.0

[params.brightness]
# Brightness spread, factor sampled in [1 - b, 1 + b]. Range 0..2.
brightness = 1.0

[params.blur]
# Largest Gaussian kernel size (odd sizes up to this). Range 1..15.
blur = 3

[params.noise]
# Maximum noise variance. Range 0..100.
noise = 10.0

[params.shear]
# Maximum horizontal shear in degrees. Range -45..45.
shear = 0.0

[params.zoom]
# Zoom percentage; factor sampled in [1 - |zoom|/100, 1 + |zoom|/100]. Range -50..50.
zoom = 0.0

[params.hue-saturation]
# Maximum hue shift (half-degree units) and saturation shift. Range -50..50.
hue = 0.0
saturation = 0.0

[params.perspective]
# Maximum inward corner displacement as a fraction of the image. Range 0..0.5.
perspective = 0.2
"##
}
