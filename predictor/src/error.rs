//! Error handling for the prediction service
//!
//! Prediction failures are reported in the response envelope
//! (`{ success: false, error }`) with a 200 status; only the envelope's
//! `error` text differs between variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{PredictionEnvelope, PredictionInputError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictorError {
    #[error("{0}")]
    InvalidInput(#[from] PredictionInputError),

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Training data error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for PredictorError {
    fn into_response(self) -> Response {
        match &self {
            PredictorError::InvalidInput(_) => tracing::info!(error = %self, "Rejected prediction input"),
            _ => tracing::error!("Error: {:?}", self),
        }

        (StatusCode::OK, Json(PredictionEnvelope::failure(self.to_string()))).into_response()
    }
}

pub type PredictorResult<T> = Result<T, PredictorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{validate_prediction_input, PredictionRequest};

    #[test]
    fn input_errors_use_joined_messages() {
        let request = PredictionRequest {
            season: "Summer".into(),
            crop_type: "Wheat".into(),
            temperature: 61.0,
            rainfall: -1.0,
            soil_moisture: 50.0,
            pest_damage: 50.0,
        };
        let err: PredictorError = validate_prediction_input(&request).unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "Temperature must be between -50 and 60°C | Rainfall must be between 0 and 500mm"
        );
    }

    #[test]
    fn missing_model_message() {
        assert_eq!(PredictorError::ModelNotLoaded.to_string(), "Model not loaded");
    }
}
