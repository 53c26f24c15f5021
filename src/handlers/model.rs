//! Model metadata handler

use axum::{extract::State, Json};

use crate::logic::model::ModelInfo;
use crate::{AppError, AppResult, AppState};

/// Describe the loaded scaler/classifier and the feature layout they expect
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let context = state.models.context().ok_or(AppError::ModelUnavailable)?;
    Ok(Json(context.info()))
}
