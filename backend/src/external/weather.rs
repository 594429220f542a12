//! Weather API client for fetching current conditions
//!
//! Integrates with the OpenWeatherMap current-weather endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{GpsCoordinates, WeatherSnapshot};

use crate::error::{AppError, AppResult};

/// Source of current weather for a farm location
#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn current_weather(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: OWMMain,
    wind: OWMWind,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

impl WeatherClient {
    /// Create a new WeatherClient
    pub fn new(api_key: String, base_url: String, timeout: std::time::Duration) -> AppResult<Self> {
        if api_key.trim().is_empty() {
            return Err(AppError::Configuration(
                "Weather API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Convert OpenWeatherMap current response to our format
    fn convert_current_response(data: OWMCurrentResponse) -> WeatherSnapshot {
        let rainfall = data
            .rain
            .and_then(|r| r.one_hour.or(r.three_hour))
            .unwrap_or(0.0);

        WeatherSnapshot {
            temp: data.main.temp,
            humidity: data.main.humidity,
            rainfall,
            wind_speed: WeatherSnapshot::mps_to_kmh(data.wind.speed),
        }
    }
}

#[async_trait]
impl WeatherGateway for WeatherClient {
    /// Fetch current weather conditions by GPS coordinates
    async fn current_weather(&self, coordinates: GpsCoordinates) -> AppResult<WeatherSnapshot> {
        let url = format!("{}/weather", self.base_url);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        tracing::debug!(%latitude, %longitude, "Fetching current weather");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", latitude.as_str()),
                ("lon", longitude.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| AppError::WeatherGateway(format!("Weather API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherGateway(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::WeatherGateway(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(Self::convert_current_response(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> WeatherSnapshot {
        let data: OWMCurrentResponse = serde_json::from_str(json).unwrap();
        WeatherClient::convert_current_response(data)
    }

    #[test]
    fn converts_openweathermap_payload() {
        let snapshot = parse(
            r#"{
                "coord": {"lat": 26.85, "lon": 80.95},
                "weather": [{"main": "Rain", "description": "light rain", "icon": "10d"}],
                "main": {"temp": 31.4, "feels_like": 36.0, "pressure": 1002, "humidity": 78},
                "wind": {"speed": 5.0, "deg": 220},
                "rain": {"1h": 2.4},
                "dt": 1719830000,
                "name": "Lucknow"
            }"#,
        );
        assert_eq!(snapshot.temp, 31.4);
        assert_eq!(snapshot.humidity, 78.0);
        assert_eq!(snapshot.rainfall, 2.4);
        assert!((snapshot.wind_speed - 18.0).abs() < 1e-9);
    }

    #[test]
    fn missing_rain_means_zero_rainfall() {
        let snapshot = parse(
            r#"{"main": {"temp": 12.0, "humidity": 40}, "wind": {"speed": 1.0}}"#,
        );
        assert_eq!(snapshot.rainfall, 0.0);
    }

    #[test]
    fn falls_back_to_three_hour_rain() {
        let snapshot = parse(
            r#"{"main": {"temp": 24.0, "humidity": 88}, "wind": {"speed": 2.0}, "rain": {"3h": 7.5}}"#,
        );
        assert_eq!(snapshot.rainfall, 7.5);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let result: Result<OWMCurrentResponse, _> = serde_json::from_str(r#"{"main": {}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn client_requires_api_key() {
        let result = WeatherClient::new(
            "  ".to_string(),
            "https://api.openweathermap.org/data/2.5".to_string(),
            std::time::Duration::from_secs(5),
        );
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
