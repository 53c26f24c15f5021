//! Landing handler

use axum::Json;
use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "🌲 Vanrakshak Forest Fire Detection API is Live and Secure!";

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

pub async fn index() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}
