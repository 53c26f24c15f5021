//! Prediction handler

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::logic::features::{ValidationError, VectorizeOptions};
use crate::logic::model::ModelHandle;
use crate::logic::pipeline::{self, InferenceResult, PipelineError};
use crate::{AppError, AppResult, AppState};

/// Classify one sensor reading.
///
/// Without a model every call is a 500, whatever the body holds. Otherwise the
/// body is parsed by hand so that empty or malformed payloads get the same
/// `{"error": ...}` shape as every other failure.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<InferenceResult>> {
    if let ModelHandle::Unavailable { .. } = &state.models {
        return Err(AppError::ModelUnavailable);
    }

    let record = parse_record(&body).map_err(PipelineError::from)?;

    let options = VectorizeOptions {
        reject_unknown: state.config.strict_features,
    };
    let result = pipeline::predict_risk(&state.models, &record, options)?;

    Ok(Json(result))
}

fn parse_record(body: &[u8]) -> Result<Value, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::EmptyRecord);
    }

    serde_json::from_slice(body)
        .map_err(|e| ValidationError::MalformedRecord(format!("invalid JSON body: {}", e)))
}
