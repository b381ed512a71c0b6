//! Fact values as a tagged sum type.
//!
//! Extraction passes emit heterogeneous value shapes: `{"value_type":
//! "point", "value": 1.1}`, `{"value_type": "range", "min": 0, "max": 5}`,
//! bare numbers, bare strings, or arbitrary structured objects. They are
//! decoded once at the ingestion boundary into [`FactValue`] and never
//! re-interpreted at the write sites.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Storage classification of a fact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueKind {
    Point,
    Range,
    Raw,
    Struct,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::Point => "POINT",
            ValueKind::Range => "RANGE",
            ValueKind::Raw => "RAW",
            ValueKind::Struct => "STRUCT",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicitly wrapped numeric values, discriminated by `value_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "value_type", rename_all = "lowercase")]
pub enum WrappedValue {
    Point { value: f64 },
    Range { min: f64, max: f64 },
}

/// One extracted fact value.
///
/// Deserialization tries the explicit wrappers first, then bare scalars,
/// and falls back to an opaque structured payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Wrapped(WrappedValue),
    Number(f64),
    Text(String),
    Struct(Json),
}

/// Column decomposition of a [`FactValue`], matching the
/// `chemical_property_values` payload columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueColumns {
    pub numeric_value: Option<f64>,
    pub range_min: Option<f64>,
    pub range_max: Option<f64>,
    pub raw_value: Option<String>,
    pub extra: Option<Json>,
}

impl FactValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FactValue::Wrapped(WrappedValue::Point { .. }) | FactValue::Number(_) => {
                ValueKind::Point
            }
            FactValue::Wrapped(WrappedValue::Range { .. }) => ValueKind::Range,
            FactValue::Text(_) => ValueKind::Raw,
            FactValue::Struct(_) => ValueKind::Struct,
        }
    }

    /// Decompose into kind-specific columns.
    pub fn columns(&self) -> ValueColumns {
        match self {
            FactValue::Wrapped(WrappedValue::Point { value }) | FactValue::Number(value) => {
                ValueColumns {
                    numeric_value: Some(*value),
                    ..Default::default()
                }
            }
            FactValue::Wrapped(WrappedValue::Range { min, max }) => ValueColumns {
                range_min: Some(*min),
                range_max: Some(*max),
                ..Default::default()
            },
            FactValue::Text(text) => ValueColumns {
                raw_value: Some(text.clone()),
                ..Default::default()
            },
            FactValue::Struct(json) => ValueColumns {
                extra: Some(json.clone()),
                ..Default::default()
            },
        }
    }

    /// Scalar amount for formulation components, when the value is a point.
    ///
    /// The component table's `amount` column is scalar-only; RANGE and
    /// STRUCT amounts additionally get an auxiliary property/value pair.
    pub fn point(&self) -> Option<f64> {
        match self {
            FactValue::Wrapped(WrappedValue::Point { value }) | FactValue::Number(value) => {
                Some(*value)
            }
            _ => None,
        }
    }
}
