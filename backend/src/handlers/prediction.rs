//! HTTP handler for stress predictions

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;
use shared::{PredictionRequest, PredictionResult};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::AppState;

/// Prediction as returned to the dashboard
#[derive(Debug, Serialize)]
pub struct StressPredictionResponse {
    #[serde(flatten)]
    pub result: PredictionResult,
    /// Friendly feature name -> signed contribution
    pub feature_attributions: BTreeMap<String, f64>,
}

impl From<PredictionResult> for StressPredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            feature_attributions: result.feature_attributions(),
            result,
        }
    }
}

/// Forward a prediction request to the prediction service
pub async fn predict_stress(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<StressPredictionResponse>> {
    let result = state.predictions.predict(&request).await?;
    tracing::info!(
        user_id = %current_user.0.user_id,
        prediction = %result.prediction,
        confidence = result.confidence,
        "Stress predicted"
    );
    Ok(Json(result.into()))
}
