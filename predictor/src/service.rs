//! Prediction pipeline: validate, build features, classify, explain

use std::cmp::Ordering;
use std::sync::Arc;

use shared::{
    validate_prediction_input, AttributionDirection, ClassProbabilities, FeatureAttribution,
    PredictionExplanation, PredictionRequest, PredictionResult, StressClass,
};

use crate::artifacts::ModelArtifacts;
use crate::classifier::StressClassifier;
use crate::error::{PredictorError, PredictorResult};
use crate::features::{build_feature_vector, friendly_name, FeatureVector};

const TOP_FACTOR_COUNT: usize = 3;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Index of the largest probability; ties go to the first class
fn most_likely(probabilities: &[f64; 3]) -> usize {
    probabilities
        .iter()
        .enumerate()
        .fold(0, |best, (i, p)| if *p > probabilities[best] { i } else { best })
}

fn attribution(column: &str, value: f64, shap: f64) -> FeatureAttribution {
    let friendly = friendly_name(column).to_string();
    let (direction, verb) = if shap > 0.0 {
        (AttributionDirection::Increases, "increased")
    } else {
        (AttributionDirection::Decreases, "decreased")
    };

    FeatureAttribution {
        feature: column.to_string(),
        farmer_friendly: format!("{} {} stress risk by {:.2}%", friendly, verb, shap.abs() * 100.0),
        friendly_name: friendly,
        shap_value: round_to(shap, 4),
        feature_value: round_to(value, 2),
        direction,
    }
}

/// Rank attributions by absolute contribution and pick the top factors
pub fn explain(features: &FeatureVector, shap_values: &[f64]) -> PredictionExplanation {
    let mut feature_importance: Vec<FeatureAttribution> = features
        .columns()
        .iter()
        .zip(features.values())
        .zip(shap_values)
        .map(|((column, value), shap)| attribution(column, *value, *shap))
        .collect();

    feature_importance.sort_by(|a, b| {
        b.shap_value
            .abs()
            .partial_cmp(&a.shap_value.abs())
            .unwrap_or(Ordering::Equal)
    });
    let top_factors = feature_importance
        .iter()
        .take(TOP_FACTOR_COUNT)
        .cloned()
        .collect();

    PredictionExplanation {
        feature_importance,
        top_factors,
    }
}

/// Stress prediction backed by the loaded artifacts and a classifier
pub struct PredictionService {
    artifacts: Option<Arc<ModelArtifacts>>,
    classifier: Arc<dyn StressClassifier>,
}

impl PredictionService {
    pub fn new(artifacts: Option<ModelArtifacts>, classifier: Arc<dyn StressClassifier>) -> Self {
        Self {
            artifacts: artifacts.map(Arc::new),
            classifier,
        }
    }

    pub fn model_loaded(&self) -> bool {
        self.artifacts.is_some()
    }

    pub async fn predict(&self, request: &PredictionRequest) -> PredictorResult<PredictionResult> {
        validate_prediction_input(request)?;
        let artifacts = self.artifacts.as_ref().ok_or(PredictorError::ModelNotLoaded)?;

        let features = build_feature_vector(artifacts, request);
        let probabilities = self.classifier.predict_proba(&features).await?;
        let prediction = StressClass::from_code(most_likely(&probabilities))
            .ok_or_else(|| PredictorError::Inference("Unknown class index".to_string()))?;

        let explanation = match self.classifier.attributions(&features, prediction).await {
            Ok(shap_values) if shap_values.len() == features.columns().len() => {
                explain(&features, &shap_values)
            }
            Ok(shap_values) => {
                tracing::warn!(
                    expected = features.columns().len(),
                    got = shap_values.len(),
                    "Attribution length mismatch; returning no explanation"
                );
                PredictionExplanation::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Attribution failed; returning no explanation");
                PredictionExplanation::default()
            }
        };

        let percent = |p: f64| round_to(p * 100.0, 2);
        let probabilities = ClassProbabilities {
            healthy: percent(probabilities[0]),
            moderate_stress: percent(probabilities[1]),
            severe_stress: percent(probabilities[2]),
        };
        let result = PredictionResult {
            prediction,
            confidence: probabilities.get(prediction),
            probabilities,
            explanation,
        };

        tracing::info!(
            prediction = %result.prediction,
            confidence = result.confidence,
            crop_type = %request.crop_type,
            season = %request.season,
            "Prediction served"
        );
        Ok(result)
    }
}
