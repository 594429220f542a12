//! Dashboard controller
//!
//! Drives a crop-cycle submission through validation, weather lookup,
//! stress evaluation and persistence, recording each step in the
//! per-user [`DashboardState`] machine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;
use shared::{
    evaluate_stress, validate_crop_data, CropCycleInput, CropCycleRecord, DashboardEvent,
    DashboardState, Season, SeasonSelector, SeasonSource, StoredCropCycle,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::WeatherGateway;
use crate::services::crop_cycle::{CropCycleStore, NewCropCycle};

pub const MISSING_COORDINATES: &str = "Location coordinates are required to fetch weather";

/// Per-request context for the signed-in farmer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: Uuid,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    state: DashboardState,
    entered_at: Instant,
}

/// Dashboard state for every active session
///
/// Only sessions away from a clean idle state are kept: in flight, showing
/// an unacknowledged error, or inside the success display window.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, SessionEntry>>>,
    success_display: Duration,
}

impl SessionRegistry {
    pub fn new(success_display: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            success_display,
        }
    }

    fn with_entry<T>(&self, user_id: Uuid, f: impl FnOnce(&mut SessionEntry) -> T) -> T {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, entry| {
            self.expire_success(entry);
            !Self::is_clean(entry)
        });

        let entry = sessions.entry(user_id).or_insert_with(|| SessionEntry {
            state: DashboardState::default(),
            entered_at: Instant::now(),
        });
        let result = f(entry);
        if Self::is_clean(entry) {
            sessions.remove(&user_id);
        }
        result
    }

    fn is_clean(entry: &SessionEntry) -> bool {
        entry.state == DashboardState::default()
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Success reverts to idle once it has been displayed long enough
    fn expire_success(&self, entry: &mut SessionEntry) {
        if entry.state == DashboardState::Success
            && entry.entered_at.elapsed() >= self.success_display
        {
            entry.state = DashboardState::default();
            entry.entered_at = Instant::now();
        }
    }

    pub fn state(&self, user_id: Uuid) -> DashboardState {
        self.with_entry(user_id, |entry| entry.state.clone())
    }

    pub fn apply(&self, user_id: Uuid, event: DashboardEvent) -> AppResult<DashboardState> {
        self.with_entry(user_id, |entry| {
            let next = entry.state.clone().apply(event)?;
            tracing::debug!(%user_id, from = entry.state.name(), to = next.name(), "Dashboard transition");
            entry.state = next.clone();
            entry.entered_at = Instant::now();
            Ok(next)
        })
    }

    /// Start a submission; rejected while another one is in flight
    pub fn begin(&self, user_id: Uuid) -> AppResult<InFlightGuard> {
        self.with_entry(user_id, |entry| {
            if entry.state.is_in_flight() {
                return Err(AppError::SubmissionInFlight);
            }
            // A new submission dismisses a success banner that is still showing
            if entry.state == DashboardState::Success {
                entry.state = DashboardState::default();
            }
            entry.state = entry.state.clone().apply(DashboardEvent::Submit)?;
            entry.entered_at = Instant::now();
            Ok(())
        })?;

        Ok(InFlightGuard {
            registry: self.clone(),
            user_id,
        })
    }

    fn abandon(&self, user_id: Uuid) {
        self.with_entry(user_id, |entry| {
            if entry.state.is_in_flight() {
                tracing::warn!(%user_id, state = entry.state.name(), "Submission abandoned");
                entry.state = DashboardState::default();
                entry.entered_at = Instant::now();
            }
        });
    }
}

/// Frees the session if a submission is dropped before reaching a terminal state
pub struct InFlightGuard {
    registry: SessionRegistry,
    user_id: Uuid,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.abandon(self.user_id);
    }
}

/// Successful submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub crop_cycle: StoredCropCycle,
    pub state: DashboardState,
}

/// Orchestrates crop-cycle submissions
#[derive(Clone)]
pub struct DashboardController {
    weather: Arc<dyn WeatherGateway>,
    store: Arc<dyn CropCycleStore>,
    sessions: SessionRegistry,
}

/// Resolve the season field: a manual pick wins, otherwise detect from the sowing date
pub fn resolve_season(input: &CropCycleInput) -> (String, SeasonSource) {
    let mut selector = SeasonSelector::new();
    selector.set_sowing_date(&input.sowing_date);

    if input.season_source == SeasonSource::Manual {
        match Season::parse(&input.season) {
            Some(season) => selector.select_manually(season),
            // An unknown manual pick goes to the validator as typed
            None => return (input.season.clone(), SeasonSource::Manual),
        }
    }

    match selector.season() {
        Some(season) => (season.to_string(), selector.source()),
        // Nothing detected; leave the raw value for the validator to judge
        None => (input.season.clone(), input.season_source),
    }
}

impl DashboardController {
    pub fn new(
        weather: Arc<dyn WeatherGateway>,
        store: Arc<dyn CropCycleStore>,
        sessions: SessionRegistry,
    ) -> Self {
        Self {
            weather,
            store,
            sessions,
        }
    }

    pub fn state(&self, ctx: &SessionContext) -> DashboardState {
        self.sessions.state(ctx.user_id)
    }

    pub fn store(&self) -> &Arc<dyn CropCycleStore> {
        &self.store
    }

    /// Dismiss an error so the form is editable again
    pub fn acknowledge(&self, ctx: &SessionContext) -> AppResult<DashboardState> {
        self.sessions.apply(ctx.user_id, DashboardEvent::Acknowledge)
    }

    /// Validate, fetch weather, evaluate and persist one submission
    pub async fn submit(
        &self,
        ctx: &SessionContext,
        mut input: CropCycleInput,
    ) -> AppResult<SubmissionOutcome> {
        let _guard = self.sessions.begin(ctx.user_id)?;
        let user_id = ctx.user_id;

        let (season, season_source) = resolve_season(&input);
        input.season = season;
        input.season_source = season_source;

        // Validating
        let report = validate_crop_data(&input);
        let mut errors = report.errors;
        let record = if errors.is_empty() {
            Some(CropCycleRecord::try_from(&input)?)
        } else {
            None
        };
        let coordinates = record.as_ref().and_then(|r| r.location.coordinates);
        if record.is_some() && coordinates.is_none() {
            errors.push(MISSING_COORDINATES.to_string());
        }

        let (record, coordinates) = match (record, coordinates) {
            (Some(record), Some(coordinates)) if errors.is_empty() => (record, coordinates),
            _ => {
                tracing::info!(%user_id, error_count = errors.len(), "Crop cycle rejected");
                self.sessions
                    .apply(user_id, DashboardEvent::ValidationFailed(errors.clone()))?;
                return Err(AppError::Validation { errors });
            }
        };
        self.sessions.apply(user_id, DashboardEvent::ValidationPassed)?;

        // Fetching weather
        let weather = match self.weather.current_weather(coordinates).await {
            Ok(weather) => weather,
            Err(err) => {
                tracing::warn!(%user_id, error = %err, "Weather lookup failed");
                self.sessions.apply(
                    user_id,
                    DashboardEvent::WeatherFailed("Weather service unavailable".to_string()),
                )?;
                return Err(match err {
                    AppError::WeatherGateway(message) => AppError::WeatherGateway(message),
                    other => AppError::WeatherGateway(other.to_string()),
                });
            }
        };
        self.sessions.apply(user_id, DashboardEvent::WeatherFetched)?;

        // Evaluating
        let assessment = evaluate_stress(&record, &weather);
        tracing::info!(
            %user_id,
            crop_type = %record.crop_type,
            score = assessment.score,
            level = %assessment.level,
            "Stress evaluated"
        );
        self.sessions.apply(user_id, DashboardEvent::Evaluated)?;

        // Persisting
        let new_cycle = NewCropCycle {
            user_id,
            record,
            season_source,
            weather,
            assessment: assessment.clone(),
        };
        match self.store.store(new_cycle).await {
            Ok(crop_cycle) => {
                let state = self
                    .sessions
                    .apply(user_id, DashboardEvent::PersistSucceeded)?;
                Ok(SubmissionOutcome { crop_cycle, state })
            }
            Err(err) => {
                let message = err.to_string();
                tracing::error!(%user_id, error = %message, "Crop cycle not saved");
                self.sessions.apply(
                    user_id,
                    DashboardEvent::PersistFailed("Assessment could not be saved".to_string()),
                )?;
                Err(AppError::Persistence {
                    message,
                    assessment: Box::new(assessment),
                })
            }
        }
    }
}
