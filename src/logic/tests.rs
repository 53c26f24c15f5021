//! Pipeline tests: vectorizer, model context and interpreter working together.

use serde_json::json;

use super::features::{ValidationError, VectorizeOptions};
use super::model::artifact::{ClassifierArtifact, ScalerArtifact};
use super::model::{ModelContext, ModelHandle};
use super::pipeline::{predict_risk, PipelineError};
use super::testing::*;

fn run(models: &ModelHandle, record: &serde_json::Value) -> Result<super::pipeline::InferenceResult, PipelineError> {
    predict_risk(models, record, VectorizeOptions::default())
}

#[test]
fn test_point_classifier_high_risk() {
    let result = run(&point_models(1), &sample_record()).unwrap();
    assert_eq!(result.prediction, 1);
    assert_eq!(result.level, "High Risk");
    assert_eq!(result.emoji, "🔥");
    assert_eq!(result.message, "Forest fire likely — take action!");
    assert!(result.probabilities.is_none());
}

#[test]
fn test_probabilistic_classifier_distribution() {
    let result = run(&probabilistic_models(1, vec![0.1, 0.7, 0.2]), &sample_record()).unwrap();
    let probs = result.probabilities.expect("distribution");
    assert_eq!(probs.len(), 3);
    assert_eq!(probs["0"], 0.1);
    assert_eq!(probs["1"], 0.7);
    assert_eq!(probs["2"], 0.2);
}

#[test]
fn test_unknown_label_still_succeeds() {
    let result = run(&point_models(7), &sample_record()).unwrap();
    assert_eq!(result.prediction, 7);
    assert_eq!(result.level, "Unknown");
    assert_eq!(result.emoji, "❓");
}

#[test]
fn test_validation_error_propagates_verbatim() {
    let mut record = sample_record();
    record.as_object_mut().unwrap().remove("smoke");

    let err = run(&point_models(0), &record).unwrap_err();
    assert_eq!(
        err,
        PipelineError::Validation(ValidationError::MissingFeature(vec!["smoke"]))
    );
}

#[test]
fn test_unavailable_models_fail_fast() {
    // Even a bad record reports unavailability first.
    let err = run(&unavailable_models(), &json!({})).unwrap_err();
    assert!(matches!(err, PipelineError::ModelUnavailable { .. }));
    assert_eq!(err.to_string(), "Model or scaler not loaded");

    for _ in 0..3 {
        assert!(matches!(
            run(&unavailable_models(), &sample_record()),
            Err(PipelineError::ModelUnavailable { .. })
        ));
    }
}

#[test]
fn test_dimension_mismatch_is_configuration_error() {
    let err = run(&truncating_models(), &sample_record()).unwrap_err();
    assert!(matches!(err, PipelineError::Configuration(_)));
    assert!(err.to_string().contains("expects 7 features, got 5"));
}

#[test]
fn test_strict_mode_rejects_extra_keys() {
    let mut record = sample_record();
    record["station"] = json!("esp001");

    assert!(run(&point_models(0), &record).is_ok());

    let strict = VectorizeOptions { reject_unknown: true };
    let err = predict_risk(&point_models(0), &record, strict).unwrap_err();
    assert!(matches!(err, PipelineError::Validation(ValidationError::UnknownFeature(_))));
}

#[test]
fn test_end_to_end_with_real_artifacts() {
    // Smoke dominates: class 1 row weights smoke heavily.
    let scaler: ScalerArtifact = serde_json::from_value(json!({
        "kind": "standard",
        "feature_names": ["temperature", "humidity", "smoke", "temp_max", "temp_min", "wind_speed", "wind_gust"],
        "mean": [25.0, 50.0, 20.0, 30.0, 15.0, 10.0, 15.0],
        "scale": [5.0, 15.0, 20.0, 5.0, 5.0, 5.0, 5.0]
    }))
    .unwrap();
    let classifier: ClassifierArtifact = serde_json::from_value(json!({
        "kind": "logistic_regression",
        "classes": [0, 1, 2],
        "coef": [
            [-0.5, 0.5, -1.0, -0.5, 0.0, -0.2, -0.2],
            [0.5, -0.5, 1.5, 0.5, 0.0, 0.2, 0.2],
            [0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.0]
        ],
        "intercept": [0.0, -0.5, 0.2]
    }))
    .unwrap();

    let context = ModelContext::new(scaler.build().unwrap(), classifier.build().unwrap()).unwrap();
    let models = ModelHandle::ready(context);

    let result = run(&models, &sample_record()).unwrap();
    assert_eq!(result.prediction, 1);
    assert_eq!(result.level, "High Risk");

    let probs = result.probabilities.expect("logistic regression is probabilistic");
    let total: f64 = probs.values().sum();
    assert!((total - 1.0).abs() < 1e-3);
    assert!(probs["1"] > probs["0"]);
}
