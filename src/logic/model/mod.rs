//! Model Module - Scaler and classifier behind the inference pipeline
//!
//! Artifacts are loaded once at startup into an immutable `ModelContext`.

pub mod artifact;
pub mod classifier;
pub mod context;
pub mod scaler;

pub use classifier::{Classifier, PointClassifier, ProbabilisticClassifier};
pub use context::{ModelContext, ModelHandle, ModelInfo};
pub use scaler::Scaler;

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Failure while calling a loaded scaler or classifier
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{stage} expects {expected} features, got {actual}")]
    DimensionMismatch {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Numeric(String),
}

/// Failure while loading or validating a persisted artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature layout mismatch at position {position}: expected {expected:?}, found {found:?}")]
    LayoutMismatch {
        position: usize,
        expected: Option<String>,
        found: Option<String>,
    },

    #[error("{component} accepts {actual} features, service provides {expected}")]
    FeatureCount {
        component: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid artifact: {0}")]
    Invalid(String),
}
