//! Risk Types
//!
//! Core types for risk interpretation. Data only, no logic beyond the lookup table.

use std::collections::BTreeMap;

use serde::Serialize;

/// Class index (as string) → probability rounded to 4 decimals
pub type Probabilities = BTreeMap<String, f64>;

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Risk levels the classifier was trained to emit, plus a fallback for drift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskLevel {
    /// No fire conditions
    Safe,
    /// Fire likely, act now
    HighRisk,
    /// Model is unsure, keep watching
    Borderline,
    /// Label outside the trained set
    Unknown,
}

impl RiskLevel {
    pub fn from_label(label: i64) -> Self {
        match label {
            0 => RiskLevel::Safe,
            1 => RiskLevel::HighRisk,
            2 => RiskLevel::Borderline,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn descriptor(&self) -> &'static RiskDescriptor {
        match self {
            RiskLevel::Safe => &SAFE,
            RiskLevel::HighRisk => &HIGH_RISK,
            RiskLevel::Borderline => &BORDERLINE,
            RiskLevel::Unknown => &UNKNOWN,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.descriptor().level
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// DESCRIPTOR TABLE
// ============================================================================

/// Human-readable interpretation of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskDescriptor {
    pub level: &'static str,
    pub emoji: &'static str,
    pub message: &'static str,
}

static SAFE: RiskDescriptor = RiskDescriptor {
    level: "Safe",
    emoji: "✅",
    message: "No fire risk detected.",
};

static HIGH_RISK: RiskDescriptor = RiskDescriptor {
    level: "High Risk",
    emoji: "🔥",
    message: "Forest fire likely — take action!",
};

static BORDERLINE: RiskDescriptor = RiskDescriptor {
    level: "Borderline",
    emoji: "⚠️",
    message: "Uncertain — monitor closely.",
};

static UNKNOWN: RiskDescriptor = RiskDescriptor {
    level: "Unknown",
    emoji: "❓",
    message: "Invalid prediction output.",
};

/// Interpreter output: descriptor plus the untouched distribution
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
    pub risk: RiskLevel,
    pub descriptor: &'static RiskDescriptor,
    pub probabilities: Option<Probabilities>,
}
