//! Stress assessment models

use serde::{Deserialize, Serialize};

/// Categorical stress bucket derived from a 0-100 score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StressLevel {
    /// 0-20
    Low,
    /// 21-40
    Moderate,
    /// 41-60
    High,
    /// 61-100
    Critical,
}

impl StressLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=20 => StressLevel::Low,
            21..=40 => StressLevel::Moderate,
            41..=60 => StressLevel::High,
            _ => StressLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::High => "High",
            StressLevel::Critical => "Critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Low" => Some(StressLevel::Low),
            "Moderate" => Some(StressLevel::Moderate),
            "High" => Some(StressLevel::High),
            "Critical" => Some(StressLevel::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for StressLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the rule-based stress evaluation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StressAssessment {
    pub score: u8,
    pub level: StressLevel,
    /// Explanations in evaluation order: soil, temperature, humidity, rainfall, season
    pub factors: Vec<String>,
}
