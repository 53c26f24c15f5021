//! Model Context
//!
//! The scaler/classifier pair, loaded once and shared read-only by every request.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::{load_classifier, load_scaler};
use super::{ArtifactError, Classifier, Scaler};
use crate::logic::features::{LayoutInfo, FEATURE_COUNT};

/// Loaded, validated model artifacts
pub struct ModelContext {
    scaler: Arc<dyn Scaler>,
    classifier: Classifier,
    loaded_at: DateTime<Utc>,
}

/// Model metadata for the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub layout: LayoutInfo,
    pub scaler: String,
    pub classifier: String,
    pub probabilities: bool,
    pub classes: Vec<i64>,
    pub loaded_at: DateTime<Utc>,
}

impl ModelContext {
    /// Both components must accept exactly the canonical feature count.
    pub fn new(scaler: Arc<dyn Scaler>, classifier: Classifier) -> Result<Self, ArtifactError> {
        if scaler.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                component: "scaler",
                expected: FEATURE_COUNT,
                actual: scaler.n_features(),
            });
        }
        if classifier.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::FeatureCount {
                component: "classifier",
                expected: FEATURE_COUNT,
                actual: classifier.n_features(),
            });
        }

        Ok(Self {
            scaler,
            classifier,
            loaded_at: Utc::now(),
        })
    }

    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactError> {
        let classifier = load_classifier(model_path)?;
        let scaler = load_scaler(scaler_path)?;
        Self::new(scaler, classifier)
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            layout: LayoutInfo::current(),
            scaler: self.scaler.kind().to_string(),
            classifier: self.classifier.kind().to_string(),
            probabilities: self.classifier.has_probabilities(),
            classes: self.classifier.classes().to_vec(),
            loaded_at: self.loaded_at,
        }
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("scaler", &self.scaler.kind())
            .field("classifier", &self.classifier)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

// ============================================================================
// HANDLE
// ============================================================================

/// Startup outcome of model loading. Never changes for the life of the process.
#[derive(Debug, Clone)]
pub enum ModelHandle {
    Ready(Arc<ModelContext>),
    Unavailable { reason: String },
}

impl ModelHandle {
    /// Load both artifacts, logging the outcome once.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Self {
        match ModelContext::load(model_path, scaler_path) {
            Ok(context) => {
                let info = context.info();
                tracing::info!(
                    classifier = %info.classifier,
                    scaler = %info.scaler,
                    probabilities = info.probabilities,
                    layout_hash = %format!("{:08x}", info.layout.hash),
                    "✅ Model and scaler loaded"
                );
                Self::Ready(Arc::new(context))
            }
            Err(e) => {
                tracing::error!(
                    model = %model_path.display(),
                    scaler = %scaler_path.display(),
                    "❌ Error loading model or scaler: {}",
                    e
                );
                Self::Unavailable { reason: e.to_string() }
            }
        }
    }

    pub fn ready(context: ModelContext) -> Self {
        Self::Ready(Arc::new(context))
    }

    pub fn context(&self) -> Option<&ModelContext> {
        match self {
            Self::Ready(context) => Some(context.as_ref()),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

// ============================================================================
// TESTS
// ============================================================================
