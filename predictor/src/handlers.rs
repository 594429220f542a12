//! HTTP handlers for the prediction service

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};
use shared::{PredictionEnvelope, PredictionRequest};

use crate::error::PredictorResult;
use crate::AppState;

/// Liveness message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Crop Stress API is running" }))
}

/// Predict crop stress with per-feature explanation
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> PredictorResult<Json<PredictionEnvelope>> {
    let result = state.service.predict(&request).await?;
    Ok(Json(PredictionEnvelope::success(result)))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_loaded: state.service.model_loaded(),
    })
}
