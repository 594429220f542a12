//! Crop stress prediction models
//!
//! Wire types exchanged between the backend and the prediction service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Inputs accepted by the prediction service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRequest {
    pub season: String,
    pub crop_type: String,
    /// °C
    pub temperature: f64,
    /// mm
    pub rainfall: f64,
    /// %
    pub soil_moisture: f64,
    /// %
    pub pest_damage: f64,
}

/// Stress severity classes predicted by the classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StressClass {
    #[serde(rename = "Healthy")]
    Healthy,
    #[serde(rename = "Moderate Stress")]
    ModerateStress,
    #[serde(rename = "Severe Stress")]
    SevereStress,
}

impl StressClass {
    pub const ALL: [StressClass; 3] = [
        StressClass::Healthy,
        StressClass::ModerateStress,
        StressClass::SevereStress,
    ];

    /// Map the classifier's integer label to a class
    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.get(code).copied()
    }

    pub fn code(&self) -> usize {
        match self {
            StressClass::Healthy => 0,
            StressClass::ModerateStress => 1,
            StressClass::SevereStress => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressClass::Healthy => "Healthy",
            StressClass::ModerateStress => "Moderate Stress",
            StressClass::SevereStress => "Severe Stress",
        }
    }
}

impl std::fmt::Display for StressClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class probabilities as percentages (0-100)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ClassProbabilities {
    #[serde(rename = "Healthy")]
    pub healthy: f64,
    #[serde(rename = "Moderate Stress")]
    pub moderate_stress: f64,
    #[serde(rename = "Severe Stress")]
    pub severe_stress: f64,
}

impl ClassProbabilities {
    pub fn get(&self, class: StressClass) -> f64 {
        match class {
            StressClass::Healthy => self.healthy,
            StressClass::ModerateStress => self.moderate_stress,
            StressClass::SevereStress => self.severe_stress,
        }
    }
}

/// Whether a feature pushed the prediction up or down
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributionDirection {
    Increases,
    Decreases,
}

/// Signed contribution of one model input to a single prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureAttribution {
    /// Raw model column name
    pub feature: String,
    pub friendly_name: String,
    pub shap_value: f64,
    pub feature_value: f64,
    pub direction: AttributionDirection,
    pub farmer_friendly: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictionExplanation {
    /// Sorted by absolute contribution, largest first
    pub feature_importance: Vec<FeatureAttribution>,
    pub top_factors: Vec<FeatureAttribution>,
}

/// Outcome of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub prediction: StressClass,
    /// Highest class probability, in percent
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    pub explanation: PredictionExplanation,
}

impl PredictionResult {
    /// Friendly feature name -> signed contribution
    pub fn feature_attributions(&self) -> BTreeMap<String, f64> {
        self.explanation
            .feature_importance
            .iter()
            .map(|a| (a.friendly_name.clone(), a.shap_value))
            .collect()
    }
}

/// Response body of `POST /api/predict`
///
/// The service always answers 200 and signals failure through `success`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<StressClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<ClassProbabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<PredictionExplanation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionEnvelope {
    pub fn success(result: PredictionResult) -> Self {
        Self {
            success: true,
            prediction: Some(result.prediction),
            confidence: Some(result.confidence),
            probabilities: Some(result.probabilities),
            explanation: Some(result.explanation),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            prediction: None,
            confidence: None,
            probabilities: None,
            explanation: None,
            error: Some(error.into()),
        }
    }

    /// Unpack into a result, or the service's error message
    pub fn into_result(self) -> Result<PredictionResult, String> {
        if !self.success {
            return Err(self
                .error
                .unwrap_or_else(|| "Prediction failed".to_string()));
        }

        match (self.prediction, self.confidence, self.probabilities) {
            (Some(prediction), Some(confidence), Some(probabilities)) => Ok(PredictionResult {
                prediction,
                confidence,
                probabilities,
                explanation: self.explanation.unwrap_or_default(),
            }),
            _ => Err("Prediction response is missing required fields".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stress_class_codes() {
        assert_eq!(StressClass::from_code(0), Some(StressClass::Healthy));
        assert_eq!(StressClass::from_code(2), Some(StressClass::SevereStress));
        assert_eq!(StressClass::from_code(3), None);
        assert_eq!(StressClass::ModerateStress.code(), 1);
    }

    #[test]
    fn failure_envelope_parses_from_service_json() {
        let json = r#"{"success": false, "error": "Temperature must be between -50 and 60°C"}"#;
        let envelope: PredictionEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(
            envelope.into_result().unwrap_err(),
            "Temperature must be between -50 and 60°C"
        );
    }

    #[test]
    fn success_envelope_parses_from_service_json() {
        let json = r#"{
            "success": true,
            "prediction": "Moderate Stress",
            "confidence": 71.5,
            "probabilities": {"Healthy": 20.0, "Moderate Stress": 71.5, "Severe Stress": 8.5},
            "explanation": {
                "feature_importance": [{
                    "feature": "T2M",
                    "friendly_name": "Temperature (°C)",
                    "shap_value": 0.42,
                    "feature_value": 38.0,
                    "direction": "increases",
                    "farmer_friendly": "Temperature (°C) increased stress risk by 42.00%"
                }],
                "top_factors": []
            }
        }"#;
        let envelope: PredictionEnvelope = serde_json::from_str(json).unwrap();
        let result = envelope.into_result().unwrap();
        assert_eq!(result.prediction, StressClass::ModerateStress);
        assert_eq!(result.probabilities.get(StressClass::Healthy), 20.0);
        assert_eq!(
            result.feature_attributions().get("Temperature (°C)"),
            Some(&0.42)
        );
    }

    #[test]
    fn success_envelope_without_prediction_is_rejected() {
        let envelope = PredictionEnvelope {
            success: true,
            ..PredictionEnvelope::failure("unused")
        };
        assert!(envelope.into_result().is_err());
    }
}
