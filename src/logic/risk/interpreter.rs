//! Risk Interpreter
//!
//! Label in, descriptor out. Unknown labels degrade to the fallback descriptor
//! instead of failing the request.

use super::types::{Interpretation, Probabilities, RiskLevel};

/// Interpret a classifier label. The distribution is passed through untouched.
pub fn interpret(label: i64, probabilities: Option<Probabilities>) -> Interpretation {
    let risk = RiskLevel::from_label(label);
    if risk == RiskLevel::Unknown {
        tracing::warn!(label, "Classifier emitted a label outside the trained set");
    }

    Interpretation {
        risk,
        descriptor: risk.descriptor(),
        probabilities,
    }
}

/// Round to 4 decimal places for transport
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Index-keyed, rounded distribution from raw classifier output
pub fn distribution(proba: &[f64]) -> Probabilities {
    proba
        .iter()
        .enumerate()
        .map(|(i, &p)| (i.to_string(), round4(p)))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
