//! Feature Vector - Core data structure for model input
//!
//! Converts an incoming JSON record into the fixed-order vector defined by
//! `layout.rs`. The record's own key order is never consulted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::layout::{is_known_feature, FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// ERRORS
// ============================================================================

/// Client-caused input problems. Always reported back, never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("No input data provided")]
    EmptyRecord,

    #[error("Malformed input: {0}")]
    MalformedRecord(String),

    #[error("Missing required feature(s): {}", .0.join(", "))]
    MissingFeature(Vec<&'static str>),

    #[error("Feature '{name}' must be numeric, got {found}")]
    NonNumericFeature { name: &'static str, found: String },

    #[error("Unknown feature(s): {}", .0.join(", "))]
    UnknownFeature(Vec<String>),
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values in the order defined by FEATURE_LAYOUT
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Name/value pairs, for logging
    pub fn named_values(&self) -> Vec<(&'static str, f64)> {
        FEATURE_LAYOUT.iter().copied().zip(self.values).collect()
    }
}

// ============================================================================
// VECTORIZER
// ============================================================================

/// Vectorizer switches
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorizeOptions {
    /// Reject keys outside the canonical layout instead of ignoring them
    pub reject_unknown: bool,
}

/// Build a feature vector from a JSON record using default (permissive) options.
#[cfg(test)]
pub fn vectorize(record: &Value) -> Result<FeatureVector, ValidationError> {
    vectorize_with(record, VectorizeOptions::default())
}

/// Build a feature vector from a JSON record.
///
/// Every absent feature is reported at once, in canonical order.
pub fn vectorize_with(
    record: &Value,
    options: VectorizeOptions,
) -> Result<FeatureVector, ValidationError> {
    let map = as_record(record)?;

    let missing: Vec<&'static str> = FEATURE_LAYOUT
        .iter()
        .copied()
        .filter(|name| !map.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFeature(missing));
    }

    if options.reject_unknown {
        let unknown: Vec<String> = map
            .keys()
            .filter(|key| !is_known_feature(key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownFeature(unknown));
        }
    }

    let mut values = [0.0f64; FEATURE_COUNT];
    for (slot, name) in values.iter_mut().zip(FEATURE_LAYOUT.iter().copied()) {
        *slot = coerce(name, &map[name])?;
    }

    Ok(FeatureVector::from_values(values))
}

fn as_record(record: &Value) -> Result<&Map<String, Value>, ValidationError> {
    match record {
        Value::Object(map) if map.is_empty() => Err(ValidationError::EmptyRecord),
        Value::Object(map) => Ok(map),
        Value::Null => Err(ValidationError::EmptyRecord),
        other => Err(ValidationError::MalformedRecord(format!(
            "expected a JSON object of feature values, got {}",
            json_kind(other)
        ))),
    }
}

/// Numbers pass through; numeric strings are parsed. Everything else is rejected.
fn coerce(name: &'static str, value: &Value) -> Result<f64, ValidationError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NonNumericFeature {
            name,
            found: describe(value),
        }),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string {:?}", s),
        Value::Number(n) => format!("non-finite number {}", n),
        other => json_kind(other).to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// TESTS
// ============================================================================
