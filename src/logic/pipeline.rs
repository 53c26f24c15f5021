//! Inference Pipeline
//!
//! record → vectorize → scale → classify → interpret → result
//!
//! Stateless: everything it reads is the immutable model context.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::features::{vectorize_with, ValidationError, VectorizeOptions};
use super::model::{ModelContext, ModelError, ModelHandle};
use super::risk::{distribution, interpret, Probabilities};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// Bad client input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Artifacts failed to load at startup
    #[error("Model or scaler not loaded")]
    ModelUnavailable { reason: String },

    /// Loaded artifacts disagree with the feature layout
    #[error("Model configuration error: {0}")]
    Configuration(ModelError),

    /// Anything else raised while scaling or predicting
    #[error("Inference failed: {0}")]
    Internal(String),
}

impl From<ModelError> for PipelineError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::DimensionMismatch { .. } => PipelineError::Configuration(err),
            ModelError::Numeric(msg) => PipelineError::Internal(msg),
        }
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Final pipeline output, serialized as the `/predict` response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub prediction: i64,
    pub level: String,
    pub emoji: String,
    pub message: String,
    /// `None` serializes as `null`: the model has no probability output
    pub probabilities: Option<Probabilities>,
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Run one record through the loaded models.
///
/// Fails fast with `ModelUnavailable` when startup loading failed.
pub fn predict_risk(
    models: &ModelHandle,
    record: &Value,
    options: VectorizeOptions,
) -> Result<InferenceResult, PipelineError> {
    let context = match models {
        ModelHandle::Ready(context) => context.as_ref(),
        ModelHandle::Unavailable { reason } => {
            return Err(PipelineError::ModelUnavailable { reason: reason.clone() });
        }
    };

    run(context, record, options)
}

fn run(
    context: &ModelContext,
    record: &Value,
    options: VectorizeOptions,
) -> Result<InferenceResult, PipelineError> {
    let features = vectorize_with(record, options)?;
    let scaled = context.scaler().transform(features.as_slice())?;

    let classifier = context.classifier();
    let label = classifier.predict(&scaled)?;
    let probabilities = classifier
        .predict_proba(&scaled)?
        .map(|proba| distribution(&proba));

    let interpretation = interpret(label, probabilities);

    tracing::debug!(
        prediction = label,
        level = %interpretation.risk,
        features = ?features.named_values(),
        "Risk prediction"
    );

    Ok(InferenceResult {
        prediction: label,
        level: interpretation.descriptor.level.to_string(),
        emoji: interpretation.descriptor.emoji.to_string(),
        message: interpretation.descriptor.message.to_string(),
        probabilities: interpretation.probabilities,
    })
}
