//! HTTP handlers for weather lookups

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{GpsCoordinates, WeatherSnapshot};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::AppState;

/// Query parameters for current weather
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl LocationQuery {
    fn coordinates(&self) -> AppResult<GpsCoordinates> {
        let mut errors = Vec::new();
        if self.latitude.abs() > Decimal::from(90) {
            errors.push("Latitude must be a number between -90 and 90".to_string());
        }
        if self.longitude.abs() > Decimal::from(180) {
            errors.push("Longitude must be a number between -180 and 180".to_string());
        }
        if !errors.is_empty() {
            return Err(AppError::Validation { errors });
        }
        Ok(GpsCoordinates::new(self.latitude, self.longitude))
    }
}

/// Current conditions at a location
pub async fn get_current_weather(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<WeatherSnapshot>> {
    let coordinates = query.coordinates()?;
    let snapshot = state.weather.current_weather(coordinates).await?;
    Ok(Json(snapshot))
}
