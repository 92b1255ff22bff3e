//! Parameter declarations and the validation gate.
//!
//! Every transform kind declares its tunable parameters here: semantic type,
//! inclusive range, default and display label. [`validate`] is the only way
//! to obtain an [`AugmentationRequest`], so everything downstream (factory,
//! executor) can assume parameters are present, typed and in range.
//!
//! ## Catalog
//!
//! | Kind | Parameter | Type | Range | Default |
//! |---|---|---|---|---|
//! | Rotation | `angle` | float | −180 … 180 | 0 |
//! | Brightness | `brightness` | float | 0 … 2 | 1.0 |
//! | Blur | `blur` | integer | 1 … 15 | 3 |
//! | Noise | `noise` | float | 0 … 100 | 10 |
//! | Shear | `shear` | float | −45 … 45 | 0 |
//! | Zoom | `zoom` | float | −50 … 50 | 0 |
//! | Hue & Saturation | `hue`, `saturation` | float | −50 … 50 | 0 |
//! | Random Perspective | `perspective` | float | 0 … 0.5 | 0.2 |
//!
//! The two flips take no parameters.

use crate::types::TransformKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{kind} requires parameter '{name}'")]
    MissingParameter {
        kind: TransformKind,
        name: &'static str,
    },
    #[error("Parameter '{name}' = {value} is outside [{min}, {max}]")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Parameter '{name}' must be {expected}, got {found}")]
    TypeMismatch {
        name: String,
        expected: ParamType,
        found: String,
    },
    #[error("{kind} does not take parameter '{name}'")]
    UnexpectedParameter { kind: TransformKind, name: String },
}

impl ValidationError {
    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            ValidationError::MissingParameter { name, .. }
            | ValidationError::OutOfRange { name, .. } => *name,
            ValidationError::TypeMismatch { name, .. }
            | ValidationError::UnexpectedParameter { name, .. } => name.as_str(),
        }
    }
}

/// Semantic type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    Float,
}

impl ParamType {
    /// Bare type name, as used in the catalog listing.
    pub fn name(self) -> &'static str {
        match self {
            ParamType::Integer => "integer",
            ParamType::Float => "float",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Integer => f.write_str("an integer"),
            ParamType::Float => f.write_str("a number"),
        }
    }
}

/// A raw, caller-supplied parameter value.
///
/// Deserializes from TOML/JSON numbers, keeping integers and floats apart so
/// that integer parameters can reject fractional input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
}

impl ParamValue {
    fn describe(self) -> String {
        match self {
            ParamValue::Integer(v) => format!("integer {v}"),
            ParamValue::Float(v) => format!("float {v}"),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a number")]
pub struct ParseValueError(pub String);

/// `"3"` parses as an integer, `"3.0"` and `"1e-1"` as floats.
impl FromStr for ParamValue {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Ok(ParamValue::Integer(v));
        }
        s.parse::<f64>()
            .map(ParamValue::Float)
            .map_err(|_| ParseValueError(s.to_string()))
    }
}

/// Supplied parameters, keyed by name.
pub type RawParams = BTreeMap<String, ParamValue>;

/// Declaration of one tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ParamSpec {
    const fn float(name: &'static str, label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            name,
            label,
            ty: ParamType::Float,
            min,
            max,
            default,
        }
    }

    const fn integer(name: &'static str, label: &'static str, min: i64, max: i64, default: i64) -> Self {
        Self {
            name,
            label,
            ty: ParamType::Integer,
            min: min as f64,
            max: max as f64,
            default: default as f64,
        }
    }

    pub fn default_value(&self) -> ParamValue {
        match self.ty {
            ParamType::Integer => ParamValue::Integer(self.default as i64),
            ParamType::Float => ParamValue::Float(self.default),
        }
    }

    /// Type-check and range-check one supplied value.
    fn check(&self, value: ParamValue) -> Result<f64, ValidationError> {
        let number = match (self.ty, value) {
            (_, ParamValue::Integer(v)) => v as f64,
            (ParamType::Float, ParamValue::Float(v)) if v.is_finite() => v,
            (_, ParamValue::Float(_)) => {
                return Err(ValidationError::TypeMismatch {
                    name: self.name.to_string(),
                    expected: self.ty,
                    found: value.describe(),
                });
            }
        };
        if number < self.min || number > self.max {
            return Err(ValidationError::OutOfRange {
                name: self.name,
                value: number,
                min: self.min,
                max: self.max,
            });
        }
        Ok(number)
    }
}

const ROTATION: &[ParamSpec] = &[ParamSpec::float("angle", "Rotation Angle", -180.0, 180.0, 0.0)];
const BRIGHTNESS: &[ParamSpec] = &[ParamSpec::float("brightness", "Brightness", 0.0, 2.0, 1.0)];
const BLUR: &[ParamSpec] = &[ParamSpec::integer("blur", "Blur Intensity", 1, 15, 3)];
const NOISE: &[ParamSpec] = &[ParamSpec::float("noise", "Noise Level", 0.0, 100.0, 10.0)];
const SHEAR: &[ParamSpec] = &[ParamSpec::float("shear", "Shear Angle", -45.0, 45.0, 0.0)];
const ZOOM: &[ParamSpec] = &[ParamSpec::float("zoom", "Zoom Factor", -50.0, 50.0, 0.0)];
const HUE_SATURATION: &[ParamSpec] = &[
    ParamSpec::float("hue", "Hue Shift", -50.0, 50.0, 0.0),
    ParamSpec::float("saturation", "Saturation Shift", -50.0, 50.0, 0.0),
];
const PERSPECTIVE: &[ParamSpec] = &[ParamSpec::float(
    "perspective",
    "Perspective Scale",
    0.0,
    0.5,
    0.2,
)];

/// The full parameter declaration for one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub kind: TransformKind,
    pub params: &'static [ParamSpec],
}

impl ParameterSpec {
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Declared defaults, for callers that want to pre-fill a request.
    pub fn defaults(&self) -> RawParams {
        self.params
            .iter()
            .map(|p| (p.name.to_string(), p.default_value()))
            .collect()
    }
}

/// Parameter declaration for `kind`. Total over the catalog.
pub fn spec_for(kind: TransformKind) -> ParameterSpec {
    let params = match kind {
        TransformKind::Rotation => ROTATION,
        TransformKind::FlipHorizontal | TransformKind::FlipVertical => &[],
        TransformKind::Brightness => BRIGHTNESS,
        TransformKind::Blur => BLUR,
        TransformKind::Noise => NOISE,
        TransformKind::Shear => SHEAR,
        TransformKind::Zoom => ZOOM,
        TransformKind::HueSaturation => HUE_SATURATION,
        TransformKind::Perspective => PERSPECTIVE,
    };
    ParameterSpec { kind, params }
}

/// Every kind's declaration, in catalog order.
pub fn catalog() -> Vec<ParameterSpec> {
    TransformKind::ALL.into_iter().map(spec_for).collect()
}

/// Strongly-typed parameters, one variant per kind.
///
/// Field names match the declared parameter names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindParams {
    Rotation { angle: f64 },
    FlipHorizontal,
    FlipVertical,
    Brightness { brightness: f64 },
    Blur { blur: u32 },
    Noise { noise: f64 },
    Shear { shear: f64 },
    Zoom { zoom: f64 },
    HueSaturation { hue: f64, saturation: f64 },
    Perspective { perspective: f64 },
}

/// A request that has passed [`validate`].
///
/// Fields are private: holding one is proof that its parameters match the
/// kind's declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AugmentationRequest {
    kind: TransformKind,
    params: KindParams,
}

impl AugmentationRequest {
    pub fn kind(&self) -> TransformKind {
        self.kind
    }

    pub fn params(&self) -> &KindParams {
        &self.params
    }
}

/// Check `supplied` against the declaration for `kind`.
///
/// Declared parameters are checked in declaration order, then any names the
/// kind does not declare. The first failure is returned.
pub fn validate(
    kind: TransformKind,
    supplied: &RawParams,
) -> Result<AugmentationRequest, ValidationError> {
    let spec = spec_for(kind);

    let mut values = Vec::with_capacity(spec.params.len());
    for param in spec.params {
        let raw = supplied
            .get(param.name)
            .copied()
            .ok_or(ValidationError::MissingParameter {
                kind,
                name: param.name,
            })?;
        values.push(param.check(raw)?);
    }

    if let Some(name) = supplied.keys().find(|name| spec.get(name).is_none()) {
        return Err(ValidationError::UnexpectedParameter {
            kind,
            name: name.clone(),
        });
    }

    let params = match (kind, values.as_slice()) {
        (TransformKind::Rotation, &[angle]) => KindParams::Rotation { angle },
        (TransformKind::FlipHorizontal, &[]) => KindParams::FlipHorizontal,
        (TransformKind::FlipVertical, &[]) => KindParams::FlipVertical,
        (TransformKind::Brightness, &[brightness]) => KindParams::Brightness { brightness },
        (TransformKind::Blur, &[blur]) => KindParams::Blur { blur: blur as u32 },
        (TransformKind::Noise, &[noise]) => KindParams::Noise { noise },
        (TransformKind::Shear, &[shear]) => KindParams::Shear { shear },
        (TransformKind::Zoom, &[zoom]) => KindParams::Zoom { zoom },
        (TransformKind::HueSaturation, &[hue, saturation]) => {
            KindParams::HueSaturation { hue, saturation }
        }
        (TransformKind::Perspective, &[perspective]) => KindParams::Perspective { perspective },
        _ => unreachable!("catalog arity for {kind:?} disagrees with KindParams"),
    };

    Ok(AugmentationRequest { kind, params })
}
