//! Weather data models

use serde::{Deserialize, Serialize};

/// Current conditions at a farm, fetched fresh for each evaluation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    /// Air temperature in °C
    pub temp: f64,
    /// Relative humidity in %
    pub humidity: f64,
    /// Rainfall in mm
    pub rainfall: f64,
    /// Wind speed in km/h
    #[serde(rename = "windSpeed", alias = "wind_speed")]
    pub wind_speed: f64,
}

impl WeatherSnapshot {
    /// Convert a wind speed reported in m/s to km/h
    pub fn mps_to_kmh(speed_mps: f64) -> f64 {
        speed_mps * 3.6
    }
}
