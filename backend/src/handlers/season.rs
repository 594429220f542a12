//! HTTP handlers for season detection

use axum::Json;
use serde::{Deserialize, Serialize};
use shared::{Season, SeasonSelector, SeasonSource};

use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct DetectSeasonInput {
    pub sowing_date: String,
    /// Farmer's own pick; overrides detection when present
    #[serde(default)]
    pub manual_season: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DetectSeasonResponse {
    pub season: Option<Season>,
    pub source: SeasonSource,
}

/// Season for a sowing date, honouring a manual override
pub async fn detect_season(Json(input): Json<DetectSeasonInput>) -> AppResult<Json<DetectSeasonResponse>> {
    let mut selector = SeasonSelector::new();
    selector.set_sowing_date(&input.sowing_date);

    if let Some(raw) = input.manual_season.as_deref().filter(|s| !s.trim().is_empty()) {
        let season = Season::parse(raw).ok_or_else(|| AppError::Validation {
            errors: vec!["Season must be one of: Summer, Winter, Monsoon".to_string()],
        })?;
        selector.select_manually(season);
    }

    Ok(Json(DetectSeasonResponse {
        season: selector.season(),
        source: selector.source(),
    }))
}

/// Seasons offered by the selector
pub async fn list_seasons() -> Json<Vec<Season>> {
    Json(Season::ALL.to_vec())
}
