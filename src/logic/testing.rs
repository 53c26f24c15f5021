//! Test doubles for the model capabilities

use std::sync::Arc;

use serde_json::{json, Value};

use super::features::FEATURE_COUNT;
use super::model::{
    Classifier, ModelContext, ModelError, ModelHandle, PointClassifier, ProbabilisticClassifier,
    Scaler,
};

/// Passes values through; can be told to drop trailing features.
pub struct StubScaler {
    pub output_len: usize,
}

impl Scaler for StubScaler {
    fn kind(&self) -> &'static str {
        "stub"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn transform(&self, input: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(input.iter().copied().take(self.output_len).collect())
    }
}

/// Always returns the same label, optionally with a fixed distribution.
pub struct StubClassifier {
    pub label: i64,
    pub proba: Vec<f64>,
}

impl PointClassifier for StubClassifier {
    fn kind(&self) -> &'static str {
        "stub"
    }

    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn classes(&self) -> &[i64] {
        &[0, 1, 2]
    }

    fn predict(&self, input: &[f64]) -> Result<i64, ModelError> {
        if input.len() != FEATURE_COUNT {
            return Err(ModelError::DimensionMismatch {
                stage: "classifier",
                expected: FEATURE_COUNT,
                actual: input.len(),
            });
        }
        Ok(self.label)
    }
}

impl ProbabilisticClassifier for StubClassifier {
    fn predict_proba(&self, _input: &[f64]) -> Result<Vec<f64>, ModelError> {
        Ok(self.proba.clone())
    }
}

pub fn point_models(label: i64) -> ModelHandle {
    let classifier = Classifier::Point(Arc::new(StubClassifier { label, proba: vec![] }));
    handle(FEATURE_COUNT, classifier)
}

pub fn probabilistic_models(label: i64, proba: Vec<f64>) -> ModelHandle {
    let classifier = Classifier::Probabilistic(Arc::new(StubClassifier { label, proba }));
    handle(FEATURE_COUNT, classifier)
}

/// Scaler that emits fewer features than the classifier expects
pub fn truncating_models() -> ModelHandle {
    let classifier = Classifier::Point(Arc::new(StubClassifier { label: 0, proba: vec![] }));
    handle(FEATURE_COUNT - 2, classifier)
}

pub fn unavailable_models() -> ModelHandle {
    ModelHandle::Unavailable {
        reason: "failed to read forest_fire_model.json: No such file or directory".to_string(),
    }
}

fn handle(output_len: usize, classifier: Classifier) -> ModelHandle {
    let context = ModelContext::new(Arc::new(StubScaler { output_len }), classifier)
        .expect("stub context");
    ModelHandle::ready(context)
}

pub fn sample_record() -> Value {
    json!({
        "temperature": 35,
        "humidity": 20,
        "smoke": 80,
        "temp_max": 40,
        "temp_min": 25,
        "wind_speed": 15,
        "wind_gust": 20
    })
}
