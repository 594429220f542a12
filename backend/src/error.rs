//! Error handling for the crop stress backend
//!
//! Every error becomes a JSON body `{ "error": { code, message, field?, details? } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{CropDataError, InvalidTransition, PredictionInputError, StressAssessment};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation failed: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Invalid prediction input: {0}")]
    PredictionInput(#[from] PredictionInputError),

    /// The prediction service refused an input as out of range
    #[error("Prediction rejected: {message}")]
    PredictionRejected { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Dashboard flow errors
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(#[from] InvalidTransition),

    // External service errors
    #[error("Weather service error: {0}")]
    WeatherGateway(String),

    #[error("Prediction service error: {0}")]
    PredictionGateway(String),

    /// The assessment was computed but could not be saved
    #[error("Persistence error: {message}")]
    Persistence {
        message: String,
        assessment: Box<StressAssessment>,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<CropDataError> for AppError {
    fn from(err: CropDataError) -> Self {
        match err {
            CropDataError::Invalid(errors) => AppError::Validation { errors },
            other => AppError::Validation {
                errors: vec![other.to_string()],
            },
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            details: None,
        }
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", msg.clone()),
            ),
            AppError::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    details: Some(serde_json::json!({ "errors": errors })),
                    ..ErrorDetail::new("VALIDATION_ERROR", "Please correct the highlighted fields")
                },
            ),
            AppError::PredictionInput(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: err.violations.first().map(|v| v.field.clone()),
                    details: serde_json::to_value(&err.violations).ok(),
                    ..ErrorDetail::new("VALIDATION_ERROR", err.to_string())
                },
            ),
            AppError::PredictionRejected { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message.clone())
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::SubmissionInFlight => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "SUBMISSION_IN_PROGRESS",
                    "Please wait for the current submission to finish",
                ),
            ),
            AppError::InvalidStateTransition(err) => (
                StatusCode::CONFLICT,
                ErrorDetail::new("INVALID_STATE_TRANSITION", err.to_string()),
            ),
            // Gateway details stay in the logs; the user gets one generic message
            AppError::WeatherGateway(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "WEATHER_SERVICE_UNAVAILABLE",
                    "Weather service is temporarily unavailable",
                ),
            ),
            AppError::PredictionGateway(_) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "PREDICTION_SERVICE_UNAVAILABLE",
                    "Prediction service is temporarily unavailable",
                ),
            ),
            AppError::Persistence { assessment, .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    details: serde_json::to_value(assessment.as_ref())
                        .ok()
                        .map(|a| serde_json::json!({ "assessment": a })),
                    ..ErrorDetail::new(
                        "PERSISTENCE_ERROR",
                        "Stress assessment was computed but could not be saved",
                    )
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
