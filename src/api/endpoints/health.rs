//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub model_mode: &'static str,
}

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let model_mode = if ctx.core.assessment().is_live() {
        "live"
    } else {
        "fallback"
    };

    Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        model_mode,
    })
}
