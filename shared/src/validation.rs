//! Validation utilities for the Crop Stress Monitoring Platform
//!
//! Crop-cycle form checks collect every failing field rather than stopping
//! at the first. Prediction inputs are range-checked with the same bounds
//! the prediction service enforces.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CropCycleInput, CropType, PredictionRequest, Season, SoilType};
use crate::season::parse_sowing_date;

// ============================================================================
// Crop-Cycle Validations
// ============================================================================

/// Outcome of validating a crop-cycle submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CropValidationReport {
    pub is_valid: bool,
    /// One message per failing field: soil, crop, date, season, village, latitude, longitude
    pub errors: Vec<String>,
}

/// Validate a crop-cycle submission
pub fn validate_crop_data(input: &CropCycleInput) -> CropValidationReport {
    let checks = [
        validate_soil_type(&input.soil_type),
        validate_crop_type(&input.crop_type),
        validate_sowing_date(&input.sowing_date),
        validate_season(&input.season),
        validate_village(&input.location.village),
        validate_latitude(input.location.lat.as_deref()),
        validate_longitude(input.location.lng.as_deref()),
    ];

    let errors: Vec<String> = checks.into_iter().filter_map(Result::err).collect();

    CropValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn one_of<T: std::fmt::Display>(options: &[T]) -> String {
    options
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn validate_soil_type(soil_type: &str) -> Result<(), String> {
    if soil_type.trim().is_empty() {
        return Err("Soil type is required".to_string());
    }
    if SoilType::parse(soil_type).is_none() {
        return Err(format!(
            "Soil type must be one of: {}",
            one_of(&SoilType::ALL)
        ));
    }
    Ok(())
}

pub fn validate_crop_type(crop_type: &str) -> Result<(), String> {
    if crop_type.trim().is_empty() {
        return Err("Crop type is required".to_string());
    }
    if CropType::parse(crop_type).is_none() {
        return Err(format!(
            "Crop type must be one of: {}",
            one_of(&CropType::ALL)
        ));
    }
    Ok(())
}

pub fn validate_sowing_date(sowing_date: &str) -> Result<(), String> {
    if sowing_date.trim().is_empty() {
        return Err("Sowing date is required".to_string());
    }
    if parse_sowing_date(sowing_date).is_none() {
        return Err("Sowing date must be a valid date (YYYY-MM-DD)".to_string());
    }
    Ok(())
}

pub fn validate_season(season: &str) -> Result<(), String> {
    if season.trim().is_empty() {
        return Err("Season is required".to_string());
    }
    if Season::parse(season).is_none() {
        return Err(format!("Season must be one of: {}", one_of(&Season::ALL)));
    }
    Ok(())
}

/// Longest village name the crop-cycle store accepts
pub const MAX_VILLAGE_LENGTH: usize = 255;

/// The village is optional, but must fit the stored column once trimmed
pub fn validate_village(village: &str) -> Result<(), String> {
    if village.trim().chars().count() > MAX_VILLAGE_LENGTH {
        return Err(format!(
            "Village name must be at most {} characters",
            MAX_VILLAGE_LENGTH
        ));
    }
    Ok(())
}

/// Parse an optional coordinate; blank means absent
pub fn parse_coordinate(raw: Option<&str>) -> Result<Option<Decimal>, rust_decimal::Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Decimal::from_str(value).map(Some),
    }
}

fn validate_coordinate(raw: Option<&str>, limit: i64, message: &str) -> Result<(), String> {
    match parse_coordinate(raw) {
        Ok(None) => Ok(()),
        Ok(Some(value)) if value.abs() <= Decimal::from(limit) => Ok(()),
        _ => Err(message.to_string()),
    }
}

pub fn validate_latitude(raw: Option<&str>) -> Result<(), String> {
    validate_coordinate(raw, 90, "Latitude must be a number between -90 and 90")
}

pub fn validate_longitude(raw: Option<&str>) -> Result<(), String> {
    validate_coordinate(raw, 180, "Longitude must be a number between -180 and 180")
}

// ============================================================================
// Prediction Input Validations
// ============================================================================

/// Accepted range for one numeric prediction input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRule {
    pub field: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl RangeRule {
    pub fn accepts(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    pub fn message(&self) -> String {
        format!(
            "{} must be between {} and {}{}",
            self.label, self.min, self.max, self.unit
        )
    }
}

/// Bounds shared by the client and the prediction service, in check order
pub const PREDICTION_INPUT_RULES: [RangeRule; 4] = [
    RangeRule {
        field: "temperature",
        label: "Temperature",
        min: -50.0,
        max: 60.0,
        unit: "°C",
    },
    RangeRule {
        field: "rainfall",
        label: "Rainfall",
        min: 0.0,
        max: 500.0,
        unit: "mm",
    },
    RangeRule {
        field: "soil_moisture",
        label: "Soil Moisture",
        min: 0.0,
        max: 100.0,
        unit: "%",
    },
    RangeRule {
        field: "pest_damage",
        label: "Pest Damage",
        min: 0.0,
        max: 100.0,
        unit: "%",
    },
];

/// The range rule whose message appears in a service error, if any
pub fn range_rule_named_in(message: &str) -> Option<&'static RangeRule> {
    PREDICTION_INPUT_RULES
        .iter()
        .find(|rule| message.contains(&rule.message()))
}

/// A prediction input outside its accepted range
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RangeViolation {
    pub field: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub message: String,
}

/// Prediction inputs rejected before reaching the model
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{}", self.messages().join(" | "))]
pub struct PredictionInputError {
    pub violations: Vec<RangeViolation>,
}

impl PredictionInputError {
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }
}

/// Range-check the numeric prediction inputs; never clamps
pub fn validate_prediction_input(request: &PredictionRequest) -> Result<(), PredictionInputError> {
    let values = [
        request.temperature,
        request.rainfall,
        request.soil_moisture,
        request.pest_damage,
    ];

    let violations: Vec<RangeViolation> = PREDICTION_INPUT_RULES
        .iter()
        .zip(values)
        .filter(|(rule, value)| !rule.accepts(*value))
        .map(|(rule, value)| RangeViolation {
            field: rule.field.to_string(),
            value,
            min: rule.min,
            max: rule.max,
            message: rule.message(),
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PredictionInputError { violations })
    }
}
