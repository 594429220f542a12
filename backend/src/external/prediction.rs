//! Crop Stress Prediction Client
//!
//! Client for the stress prediction service. Inputs are range-checked here
//! before any request leaves the backend.

use reqwest::Client;
use shared::{
    range_rule_named_in, validate_prediction_input, PredictionEnvelope, PredictionRequest,
    PredictionResult,
};

use crate::error::{AppError, AppResult};

/// Client for the prediction microservice
#[derive(Clone)]
pub struct PredictionClient {
    api_endpoint: String,
    http_client: Client,
}

impl PredictionClient {
    /// Create a new prediction client
    pub fn new(api_endpoint: String, timeout: std::time::Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Validate the inputs, then request a prediction with attributions
    pub async fn predict(&self, request: &PredictionRequest) -> AppResult<PredictionResult> {
        validate_prediction_input(request)?;

        let url = format!("{}/api/predict", self.api_endpoint);
        tracing::debug!(
            crop_type = %request.crop_type,
            season = %request.season,
            "Requesting stress prediction"
        );

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::PredictionGateway(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::PredictionGateway(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let envelope: PredictionEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::PredictionGateway(format!("Failed to parse response: {}", e)))?;

        envelope.into_result().map_err(envelope_error)
    }
}

/// Range complaints from the service reach the user; anything else is a gateway fault
fn envelope_error(message: String) -> AppError {
    match range_rule_named_in(&message) {
        Some(rule) => AppError::PredictionRejected {
            field: rule.field.to_string(),
            message,
        },
        None => AppError::PredictionGateway(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn request(temperature: f64) -> PredictionRequest {
        PredictionRequest {
            season: "Summer".to_string(),
            crop_type: "Wheat".to_string(),
            temperature,
            rainfall: 12.0,
            soil_moisture: 35.0,
            pest_damage: 10.0,
        }
    }

    #[tokio::test]
    async fn out_of_range_input_never_reaches_the_network() {
        // Nothing listens on the discard port; a network attempt would surface
        // as a gateway error instead.
        let client =
            PredictionClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(1))
                .unwrap();

        let err = client.predict(&request(70.0)).await.unwrap_err();
        match err {
            AppError::PredictionInput(input_err) => {
                assert_eq!(
                    input_err.to_string(),
                    "Temperature must be between -50 and 60°C"
                );
            }
            other => panic!("expected local validation error, got {:?}", other),
        }
    }

    #[test]
    fn range_failure_envelope_is_a_rejection() {
        let envelope: PredictionEnvelope = serde_json::from_str(
            r#"{"success": false, "error": "Soil Moisture must be between 0 and 100%"}"#,
        )
        .unwrap();
        let err = envelope_error(envelope.into_result().unwrap_err());
        match err {
            AppError::PredictionRejected { field, message } => {
                assert_eq!(field, "soil_moisture");
                assert_eq!(message, "Soil Moisture must be between 0 and 100%");
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[test]
    fn other_failure_envelopes_are_gateway_errors() {
        let err = envelope_error("Model not loaded".to_string());
        assert!(matches!(err, AppError::PredictionGateway(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_gateway_error() {
        let client =
            PredictionClient::new("http://127.0.0.1:9/".to_string(), Duration::from_secs(1))
                .unwrap();

        let err = client.predict(&request(25.0)).await.unwrap_err();
        assert!(matches!(err, AppError::PredictionGateway(_)));
    }
}
