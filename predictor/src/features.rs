//! Feature-vector construction and display names for model inputs

use serde::Serialize;
use shared::PredictionRequest;

use crate::artifacts::ModelArtifacts;

pub const TEMPERATURE: &str = "T2M";
pub const RAINFALL: &str = "Rainfall";
pub const SOIL_MOISTURE: &str = "Soil_Moisture";
pub const PEST_DAMAGE: &str = "Pest_Damage";
pub const PEST_HOTSPOTS: &str = "Pest_Hotspots";
pub const TEMP_DEVIATION: &str = "temp_deviation_from_normal";

pub const PEST_DAMAGE_X_MOISTURE: &str = "pest_damage_x_moisture";
pub const PEST_DAMAGE_X_TEMP_DEVIATION: &str = "pest_damage_x_temp_deviation";
pub const PEST_HOTSPOTS_X_RAINFALL: &str = "pest_hotspots_x_rainfall";

const SEASON_PREFIX: &str = "Season_";
const CROP_TYPE_PREFIX: &str = "Crop_Type_";

/// Raw model column -> name shown to farmers
pub const FRIENDLY_NAMES: &[(&str, &str)] = &[
    ("T2M", "Temperature (°C)"),
    ("RH2M", "Humidity (%)"),
    ("T2MDEW", "Dew Point (°C)"),
    ("temp_deviation_from_normal", "Temp Deviation"),
    ("consecutive_dry_days", "Consecutive Dry Days"),
    ("Elevation_Data", "Elevation"),
    ("Rainfall", "Rainfall (mm)"),
    ("Wind_Speed", "Wind Speed"),
    ("Soil_Moisture", "Soil Moisture (%)"),
    ("Soil_pH", "Soil pH"),
    ("Organic_Matter", "Organic Matter"),
    ("Pest_Hotspots", "Pest Hotspots"),
    ("Weed_Coverage", "Weed Coverage"),
    ("Pest_Damage", "Pest Damage (%)"),
    ("Crop_Type_Rice", "Rice Crop"),
    ("Crop_Type_Wheat", "Wheat Crop"),
    ("Texture_Clay loam", "Texture: Clay Loam"),
    ("Texture_Loam", "Texture: Loam"),
    ("Texture_Sandy clay loam", "Texture: Sandy Clay Loam"),
    ("Crop_Growth_Stage_2.0", "Growth Stage 2"),
    ("Crop_Growth_Stage_3.0", "Growth Stage 3"),
    ("Crop_Growth_Stage_4.0", "Growth Stage 4"),
    ("Season_Summer", "Summer Season"),
    ("Season_Winter", "Winter Season"),
    ("Season_Monsoon", "Monsoon Season"),
    ("pest_damage_x_moisture", "Pest Damage × Moisture"),
    ("pest_damage_x_temp_deviation", "Pest Damage × Temp Deviation"),
    ("pest_hotspots_x_rainfall", "Pest Hotspots × Rainfall"),
];

/// Display name for a model column, or the column itself if unknown
pub fn friendly_name(column: &str) -> &str {
    FRIENDLY_NAMES
        .iter()
        .find(|(key, _)| *key == column)
        .map(|(_, name)| *name)
        .unwrap_or(column)
}

/// One row of model input, in model column order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of a column; columns the model does not use read as 0
    pub fn get(&self, column: &str) -> f64 {
        self.position(column).map_or(0.0, |i| self.values[i])
    }

    fn set(&mut self, column: &str, value: f64) {
        if let Some(i) = self.position(column) {
            self.values[i] = value;
        }
    }

    /// Set the one-hot indicator `<prefix><category>` if the model has it
    fn set_indicator(&mut self, prefix: &str, category: &str) -> bool {
        let category = category.trim();
        if category.is_empty() {
            return false;
        }

        let exact = format!("{}{}", prefix, category);
        let index = self.position(&exact).or_else(|| {
            let category = category.to_ascii_lowercase();
            self.columns.iter().position(|c| {
                c.starts_with(prefix) && c.to_ascii_lowercase().ends_with(&category)
            })
        });

        match index {
            Some(i) => {
                self.values[i] = 1.0;
                true
            }
            None => false,
        }
    }
}

/// Model input for a request: training means, with the caller's
/// categories and measurements written over them
pub fn build_feature_vector(artifacts: &ModelArtifacts, request: &PredictionRequest) -> FeatureVector {
    let mut features = FeatureVector {
        columns: artifacts.columns().to_vec(),
        values: artifacts.baseline().to_vec(),
    };

    for (column, value) in features.columns.iter().zip(features.values.iter_mut()) {
        if column.starts_with(SEASON_PREFIX) || column.starts_with(CROP_TYPE_PREFIX) {
            *value = 0.0;
        }
    }
    if !features.set_indicator(SEASON_PREFIX, &request.season) {
        tracing::debug!(season = %request.season, "Season not known to the model");
    }
    if !features.set_indicator(CROP_TYPE_PREFIX, &request.crop_type) {
        tracing::debug!(crop_type = %request.crop_type, "Crop type not known to the model");
    }

    features.set(TEMPERATURE, request.temperature);
    features.set(RAINFALL, request.rainfall);
    features.set(SOIL_MOISTURE, request.soil_moisture);
    features.set(PEST_DAMAGE, request.pest_damage);

    // Interaction terms use the caller's values even when the raw column is absent
    let temp_deviation = features.get(TEMP_DEVIATION);
    let pest_hotspots = features.get(PEST_HOTSPOTS);
    features.set(
        PEST_DAMAGE_X_MOISTURE,
        request.pest_damage * request.soil_moisture,
    );
    features.set(PEST_DAMAGE_X_TEMP_DEVIATION, request.pest_damage * temp_deviation);
    features.set(PEST_HOTSPOTS_X_RAINFALL, pest_hotspots * request.rainfall);

    features
}
