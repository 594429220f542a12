//! Stress classifier seam
//!
//! The trained model runs behind an inference server; [`RemoteClassifier`]
//! speaks its JSON protocol.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::StressClass;

use crate::error::{PredictorError, PredictorResult};
use crate::features::FeatureVector;

/// Three-class stress classifier with per-feature attribution
#[async_trait]
pub trait StressClassifier: Send + Sync {
    /// Probabilities for Healthy, Moderate Stress, Severe Stress, in that order
    async fn predict_proba(&self, features: &FeatureVector) -> PredictorResult<[f64; 3]>;

    /// Signed contribution of each column towards `class`, in column order
    async fn attributions(
        &self,
        features: &FeatureVector,
        class: StressClass,
    ) -> PredictorResult<Vec<f64>>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    columns: &'a [String],
    instances: [&'a [f64]; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    class_index: Option<usize>,
}

#[derive(Deserialize)]
struct ProbabilityResponse {
    probabilities: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct AttributionResponse {
    shap_values: Vec<Vec<f64>>,
}

/// Classifier served over HTTP
#[derive(Clone)]
pub struct RemoteClassifier {
    client: Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(endpoint: &str, timeout: std::time::Duration) -> PredictorResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PredictorError::Inference(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &InferenceRequest<'_>,
    ) -> PredictorResult<T> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| PredictorError::Inference(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PredictorError::Inference(format!(
                "Inference server returned {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PredictorError::Inference(format!("Failed to parse response: {}", e)))
    }
}

/// First row of a batch response, checked for length and finiteness
fn single_row(rows: Vec<Vec<f64>>, expected_len: usize, what: &str) -> PredictorResult<Vec<f64>> {
    let row = rows
        .into_iter()
        .next()
        .ok_or_else(|| PredictorError::Inference(format!("Empty {} response", what)))?;
    if row.len() != expected_len {
        return Err(PredictorError::Inference(format!(
            "Expected {} {} values, got {}",
            expected_len,
            what,
            row.len()
        )));
    }
    if row.iter().any(|v| !v.is_finite()) {
        return Err(PredictorError::Inference(format!("Non-finite {} value", what)));
    }
    Ok(row)
}

#[async_trait]
impl StressClassifier for RemoteClassifier {
    async fn predict_proba(&self, features: &FeatureVector) -> PredictorResult<[f64; 3]> {
        let request = InferenceRequest {
            columns: features.columns(),
            instances: [features.values()],
            class_index: None,
        };
        let response: ProbabilityResponse = self.call("/v1/predict_proba", &request).await?;
        let row = single_row(response.probabilities, StressClass::ALL.len(), "probability")?;
        Ok([row[0], row[1], row[2]])
    }

    async fn attributions(
        &self,
        features: &FeatureVector,
        class: StressClass,
    ) -> PredictorResult<Vec<f64>> {
        let request = InferenceRequest {
            columns: features.columns(),
            instances: [features.values()],
            class_index: Some(class.code()),
        };
        let response: AttributionResponse = self.call("/v1/explain", &request).await?;
        single_row(response.shap_values, features.columns().len(), "attribution")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_row() {
        let row = single_row(vec![vec![0.2, 0.5, 0.3], vec![1.0, 0.0, 0.0]], 3, "probability");
        assert_eq!(row.unwrap(), vec![0.2, 0.5, 0.3]);
    }

    #[test]
    fn rejects_wrong_width() {
        let result = single_row(vec![vec![0.5, 0.5]], 3, "probability");
        assert!(matches!(result, Err(PredictorError::Inference(msg)) if msg.contains("got 2")));
    }

    #[test]
    fn rejects_empty_and_non_finite() {
        assert!(single_row(vec![], 3, "probability").is_err());
        assert!(single_row(vec![vec![f64::NAN, 0.0, 1.0]], 3, "probability").is_err());
    }

    #[test]
    fn request_body_shape() {
        let columns = vec!["T2M".to_string(), "Rainfall".to_string()];
        let values = vec![30.0, 5.0];
        let body = serde_json::to_value(InferenceRequest {
            columns: &columns,
            instances: [values.as_slice()],
            class_index: Some(2),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "columns": ["T2M", "Rainfall"],
                "instances": [[30.0, 5.0]],
                "class_index": 2
            })
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_an_inference_error() {
        let classifier =
            RemoteClassifier::new("http://127.0.0.1:9", std::time::Duration::from_secs(1)).unwrap();
        let features = crate::features::build_feature_vector(
            &crate::artifacts::ModelArtifacts::from_means(
                vec!["T2M".to_string()],
                &Default::default(),
            ),
            &shared::PredictionRequest {
                season: "Summer".into(),
                crop_type: "Rice".into(),
                temperature: 30.0,
                rainfall: 0.0,
                soil_moisture: 20.0,
                pest_damage: 0.0,
            },
        );
        let result = classifier.predict_proba(&features).await;
        assert!(matches!(result, Err(PredictorError::Inference(_))));
    }
}
