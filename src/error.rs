//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::logic::pipeline::PipelineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Client input errors
    ValidationError(String),

    // Startup condition: artifacts failed to load
    ModelUnavailable,

    // Loaded artifacts inconsistent with the feature layout
    ConfigurationError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => {
                tracing::warn!("Rejected input: {}", msg);
                (StatusCode::BAD_REQUEST, msg.as_str())
            }
            AppError::ModelUnavailable => (StatusCode::INTERNAL_SERVER_ERROR, "Model or scaler not loaded"),
            AppError::ConfigurationError(msg) => {
                tracing::error!("Model configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.as_str())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(e) => AppError::ValidationError(e.to_string()),
            PipelineError::ModelUnavailable { .. } => AppError::ModelUnavailable,
            e @ PipelineError::Configuration(_) => AppError::ConfigurationError(e.to_string()),
            e @ PipelineError::Internal(_) => AppError::InternalError(e.to_string()),
        }
    }
}
