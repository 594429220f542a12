//! Crop-cycle models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{StressAssessment, WeatherSnapshot};
use crate::types::{string_or_number, GpsCoordinates};

/// Crops supported by the dashboard form
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CropType {
    Rice,
    Wheat,
    Maize,
    Cotton,
    Sugarcane,
    Soybean,
    Groundnut,
    Millet,
}

impl CropType {
    pub const ALL: [CropType; 8] = [
        CropType::Rice,
        CropType::Wheat,
        CropType::Maize,
        CropType::Cotton,
        CropType::Sugarcane,
        CropType::Soybean,
        CropType::Groundnut,
        CropType::Millet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Rice => "Rice",
            CropType::Wheat => "Wheat",
            CropType::Maize => "Maize",
            CropType::Cotton => "Cotton",
            CropType::Sugarcane => "Sugarcane",
            CropType::Soybean => "Soybean",
            CropType::Groundnut => "Groundnut",
            CropType::Millet => "Millet",
        }
    }

    /// Case-insensitive lookup on trimmed input
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|crop| crop.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CropType {
    type Err = CropDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CropDataError::UnknownCropType(s.to_string()))
    }
}

/// Soil classes recognised by the stress heuristics
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoilType {
    Sandy,
    Clay,
    Loamy,
    Silt,
    Black,
    Red,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Sandy,
        SoilType::Clay,
        SoilType::Loamy,
        SoilType::Silt,
        SoilType::Black,
        SoilType::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Clay => "Clay",
            SoilType::Loamy => "Loamy",
            SoilType::Silt => "Silt",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|soil| soil.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SoilType {
    type Err = CropDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CropDataError::UnknownSoilType(s.to_string()))
    }
}

/// Growing seasons offered by the season selector
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Summer,
    Winter,
    Monsoon,
}

impl Season {
    /// Selector options, in display order
    pub const ALL: [Season; 3] = [Season::Summer, Season::Winter, Season::Monsoon];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "Summer",
            Season::Winter => "Winter",
            Season::Monsoon => "Monsoon",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|season| season.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = CropDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| CropDataError::UnknownSeason(s.to_string()))
    }
}

/// Whether the season was detected from the sowing date or picked by the farmer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeasonSource {
    #[default]
    Auto,
    Manual,
}

impl SeasonSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonSource::Auto => "auto",
            SeasonSource::Manual => "manual",
        }
    }
}

impl std::fmt::Display for SeasonSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location fields as submitted by the form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationInput {
    #[serde(default)]
    pub village: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lat: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub lng: Option<String>,
}

/// Raw crop-cycle form submission; nothing here is trusted until validated
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CropCycleInput {
    #[serde(default)]
    pub crop_type: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default)]
    pub sowing_date: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub season_source: SeasonSource,
    #[serde(default)]
    pub location: LocationInput,
}

/// Farm location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub village: String,
    pub coordinates: Option<GpsCoordinates>,
}

/// A validated crop cycle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropCycleRecord {
    pub crop_type: CropType,
    pub soil_type: SoilType,
    pub sowing_date: NaiveDate,
    pub season: Season,
    pub location: Location,
}

impl TryFrom<&CropCycleInput> for CropCycleRecord {
    type Error = CropDataError;

    fn try_from(input: &CropCycleInput) -> Result<Self, Self::Error> {
        let report = crate::validation::validate_crop_data(input);
        if !report.is_valid {
            return Err(CropDataError::Invalid(report.errors));
        }

        let sowing_date = crate::season::parse_sowing_date(&input.sowing_date)
            .ok_or_else(|| CropDataError::InvalidDate(input.sowing_date.clone()))?;

        let coordinates = match (
            crate::validation::parse_coordinate(input.location.lat.as_deref()),
            crate::validation::parse_coordinate(input.location.lng.as_deref()),
        ) {
            (Ok(Some(latitude)), Ok(Some(longitude))) => {
                Some(GpsCoordinates::new(latitude, longitude))
            }
            _ => None,
        };

        Ok(Self {
            crop_type: input.crop_type.parse()?,
            soil_type: input.soil_type.parse()?,
            sowing_date,
            season: input.season.parse()?,
            location: Location {
                village: input.location.village.trim().to_string(),
                coordinates,
            },
        })
    }
}

/// A crop cycle as persisted, together with the assessment computed for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCropCycle {
    pub id: Uuid,
    pub user_id: Uuid,
    pub record: CropCycleRecord,
    pub season_source: SeasonSource,
    pub weather: WeatherSnapshot,
    pub assessment: StressAssessment,
    pub created_at: DateTime<Utc>,
}

/// Crop-data errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CropDataError {
    #[error("Crop data is invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("Unknown crop type: {0}")]
    UnknownCropType(String),

    #[error("Unknown soil type: {0}")]
    UnknownSoilType(String),

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Invalid sowing date: {0}")]
    InvalidDate(String),
}
