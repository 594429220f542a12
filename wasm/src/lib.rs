//! WebAssembly module for the Crop Stress Monitoring Platform
//!
//! Provides client-side computation for:
//! - Season detection and the season selector
//! - Crop-cycle form validation
//! - Stress score preview
//! - Prediction input range checks
//! - Dashboard state transitions

use serde::Deserialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

use shared::{DashboardEvent, DashboardState, SeasonSelector};

fn console_warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

fn from_json<'a, T: Deserialize<'a>>(json: &'a str, what: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(|e| {
        let message = format!("Invalid {} JSON: {}", what, e);
        console_warn(&message);
        JsValue::from_str(&message)
    })
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&JsValue::from_str(concat!(
        "cropwatch-wasm ",
        env!("CARGO_PKG_VERSION")
    )));
}

/// Season for a sowing date, or undefined if the date cannot be read
#[wasm_bindgen]
pub fn detect_season(sowing_date: &str) -> Option<String> {
    shared::detect_season_from_str(sowing_date).map(|s| s.to_string())
}

/// Options for the season selector
#[wasm_bindgen]
pub fn list_seasons() -> js_sys::Array {
    Season::ALL
        .iter()
        .map(|season| JsValue::from_str(season.as_str()))
        .collect()
}

/// Validate a crop-cycle form; returns `{ is_valid, errors }` as JSON
#[wasm_bindgen]
pub fn validate_crop_cycle(input_json: &str) -> Result<String, JsValue> {
    let input: CropCycleInput = from_json(input_json, "crop cycle")?;
    to_json(&validate_crop_data(&input))
}

/// Score a crop cycle against weather without saving it
///
/// Returns the assessment JSON, or rejects with the validation messages.
#[wasm_bindgen]
pub fn preview_stress(input_json: &str, weather_json: &str) -> Result<String, JsValue> {
    let input: CropCycleInput = from_json(input_json, "crop cycle")?;
    let weather: WeatherSnapshot = from_json(weather_json, "weather")?;

    let record = CropCycleRecord::try_from(&input).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_json(&shared::evaluate_stress(&record, &weather))
}

/// Stress level label for a 0-100 score
#[wasm_bindgen]
pub fn stress_level_for_score(score: u8) -> String {
    StressLevel::from_score(score).to_string()
}

/// Range-check prediction inputs; returns the messages as a JSON array
#[wasm_bindgen]
pub fn check_prediction_inputs(
    temperature: f64,
    rainfall: f64,
    soil_moisture: f64,
    pest_damage: f64,
) -> Result<String, JsValue> {
    let request = PredictionRequest {
        season: String::new(),
        crop_type: String::new(),
        temperature,
        rainfall,
        soil_moisture,
        pest_damage,
    };
    let messages = match validate_prediction_input(&request) {
        Ok(()) => Vec::new(),
        Err(err) => err.messages(),
    };
    to_json(&messages)
}

/// Season selector bound to the sowing-date field
#[wasm_bindgen]
#[derive(Default)]
pub struct SeasonPicker {
    selector: SeasonSelector,
}

#[wasm_bindgen]
impl SeasonPicker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sowing_date(&mut self, sowing_date: &str) {
        self.selector.set_sowing_date(sowing_date);
    }

    /// Returns false for a season the selector does not offer
    pub fn select(&mut self, season: &str) -> bool {
        match Season::parse(season) {
            Some(season) => {
                self.selector.select_manually(season);
                true
            }
            None => {
                console_warn(&format!("Unknown season: {}", season));
                false
            }
        }
    }

    pub fn reset_to_auto(&mut self) {
        self.selector.reset_to_auto();
    }

    pub fn season(&self) -> Option<String> {
        self.selector.season().map(|s| s.to_string())
    }

    /// "auto" or "manual"
    pub fn source(&self) -> String {
        self.selector.source().to_string()
    }
}

/// Event payload sent from the page
#[derive(Deserialize)]
#[serde(tag = "event", content = "detail", rename_all = "snake_case")]
enum PageEvent {
    Submit,
    ValidationPassed,
    ValidationFailed(Vec<String>),
    WeatherFetched,
    WeatherFailed(String),
    Evaluated,
    PersistSucceeded,
    PersistFailed(String),
    DisplayTimeout,
    Acknowledge,
}

impl From<PageEvent> for DashboardEvent {
    fn from(event: PageEvent) -> Self {
        match event {
            PageEvent::Submit => DashboardEvent::Submit,
            PageEvent::ValidationPassed => DashboardEvent::ValidationPassed,
            PageEvent::ValidationFailed(errors) => DashboardEvent::ValidationFailed(errors),
            PageEvent::WeatherFetched => DashboardEvent::WeatherFetched,
            PageEvent::WeatherFailed(message) => DashboardEvent::WeatherFailed(message),
            PageEvent::Evaluated => DashboardEvent::Evaluated,
            PageEvent::PersistSucceeded => DashboardEvent::PersistSucceeded,
            PageEvent::PersistFailed(message) => DashboardEvent::PersistFailed(message),
            PageEvent::DisplayTimeout => DashboardEvent::DisplayTimeout,
            PageEvent::Acknowledge => DashboardEvent::Acknowledge,
        }
    }
}

/// Client-side copy of the dashboard state machine
#[wasm_bindgen]
#[derive(Default)]
pub struct DashboardMachine {
    state: DashboardState,
}

#[wasm_bindgen]
impl DashboardMachine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `{ "event": "...", "detail": ... }`; returns the new state as JSON
    pub fn apply(&mut self, event_json: &str) -> Result<String, JsValue> {
        let event: PageEvent = from_json(event_json, "dashboard event")?;
        let next = self
            .state
            .clone()
            .apply(event.into())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.state = next;
        self.state_json()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        to_json(&self.state)
    }

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_in_flight()
    }
}
