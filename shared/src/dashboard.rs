//! Dashboard submission state machine
//!
//! ```text
//! Idle --Submit--> Validating --ValidationPassed--> FetchingWeather
//!   --WeatherFetched--> Evaluating --Evaluated--> Persisting
//!   --PersistSucceeded--> Success --DisplayTimeout--> Idle
//! ```
//! Validation, gateway and persistence failures land in `Error`;
//! `Acknowledge` returns to `Idle`, keeping validation messages on screen.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a submission ended in the error state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DashboardFailure {
    /// Field-level problems, one message per field
    Validation(Vec<String>),
    /// Weather or prediction service unavailable or malformed
    Gateway(String),
    /// Assessment computed but not saved
    Persistence(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DashboardState {
    Idle { errors: Vec<String> },
    Validating,
    FetchingWeather,
    Evaluating,
    Persisting,
    Success,
    Error { failure: DashboardFailure },
}

impl Default for DashboardState {
    fn default() -> Self {
        DashboardState::Idle { errors: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
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

impl DashboardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardEvent::Submit => "submit",
            DashboardEvent::ValidationPassed => "validation_passed",
            DashboardEvent::ValidationFailed(_) => "validation_failed",
            DashboardEvent::WeatherFetched => "weather_fetched",
            DashboardEvent::WeatherFailed(_) => "weather_failed",
            DashboardEvent::Evaluated => "evaluated",
            DashboardEvent::PersistSucceeded => "persist_succeeded",
            DashboardEvent::PersistFailed(_) => "persist_failed",
            DashboardEvent::DisplayTimeout => "display_timeout",
            DashboardEvent::Acknowledge => "acknowledge",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Event '{event}' is not allowed in state '{state}'")]
pub struct InvalidTransition {
    pub state: &'static str,
    pub event: &'static str,
}

impl DashboardState {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardState::Idle { .. } => "idle",
            DashboardState::Validating => "validating",
            DashboardState::FetchingWeather => "fetching_weather",
            DashboardState::Evaluating => "evaluating",
            DashboardState::Persisting => "persisting",
            DashboardState::Success => "success",
            DashboardState::Error { .. } => "error",
        }
    }

    /// A submission is being processed; the submit control stays disabled
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DashboardState::Validating
                | DashboardState::FetchingWeather
                | DashboardState::Evaluating
                | DashboardState::Persisting
        )
    }

    pub fn can_submit(&self) -> bool {
        matches!(self, DashboardState::Idle { .. } | DashboardState::Error { .. })
    }

    /// Apply an event, returning the next state
    pub fn apply(self, event: DashboardEvent) -> Result<DashboardState, InvalidTransition> {
        use DashboardEvent as E;
        use DashboardState as S;

        let next = match (&self, event) {
            (S::Idle { .. } | S::Error { .. }, E::Submit) => S::Validating,

            (S::Validating, E::ValidationPassed) => S::FetchingWeather,
            (S::Validating, E::ValidationFailed(errors)) => S::Error {
                failure: DashboardFailure::Validation(errors),
            },

            (S::FetchingWeather, E::WeatherFetched) => S::Evaluating,
            (S::FetchingWeather, E::WeatherFailed(message)) => S::Error {
                failure: DashboardFailure::Gateway(message),
            },

            (S::Evaluating, E::Evaluated) => S::Persisting,

            (S::Persisting, E::PersistSucceeded) => S::Success,
            (S::Persisting, E::PersistFailed(message)) => S::Error {
                failure: DashboardFailure::Persistence(message),
            },

            (S::Success, E::DisplayTimeout) => S::default(),

            (S::Error { failure }, E::Acknowledge) => match failure {
                DashboardFailure::Validation(errors) => S::Idle {
                    errors: errors.clone(),
                },
                _ => S::default(),
            },

            (state, event) => {
                return Err(InvalidTransition {
                    state: state.name(),
                    event: event.name(),
                })
            }
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(events: Vec<DashboardEvent>) -> Result<DashboardState, InvalidTransition> {
        events
            .into_iter()
            .try_fold(DashboardState::default(), DashboardState::apply)
    }

    #[test]
    fn happy_path_returns_to_idle() {
        let state = run(vec![
            DashboardEvent::Submit,
            DashboardEvent::ValidationPassed,
            DashboardEvent::WeatherFetched,
            DashboardEvent::Evaluated,
            DashboardEvent::PersistSucceeded,
        ])
        .unwrap();
        assert_eq!(state, DashboardState::Success);

        let state = state.apply(DashboardEvent::DisplayTimeout).unwrap();
        assert_eq!(state, DashboardState::default());
    }

    #[test]
    fn validation_failure_keeps_errors_after_acknowledge() {
        let errors = vec!["Soil type is required".to_string()];
        let state = run(vec![
            DashboardEvent::Submit,
            DashboardEvent::ValidationFailed(errors.clone()),
        ])
        .unwrap();
        assert_eq!(
            state,
            DashboardState::Error {
                failure: DashboardFailure::Validation(errors.clone())
            }
        );

        let state = state.apply(DashboardEvent::Acknowledge).unwrap();
        assert_eq!(state, DashboardState::Idle { errors });
    }

    #[test]
    fn gateway_failure_aborts_before_persisting() {
        let state = run(vec![
            DashboardEvent::Submit,
            DashboardEvent::ValidationPassed,
            DashboardEvent::WeatherFailed("timeout".to_string()),
        ])
        .unwrap();
        assert!(matches!(
            state,
            DashboardState::Error {
                failure: DashboardFailure::Gateway(_)
            }
        ));
        assert!(state.can_submit());
    }

    #[test]
    fn persistence_failure_is_distinct() {
        let state = run(vec![
            DashboardEvent::Submit,
            DashboardEvent::ValidationPassed,
            DashboardEvent::WeatherFetched,
            DashboardEvent::Evaluated,
            DashboardEvent::PersistFailed("connection reset".to_string()),
        ])
        .unwrap();
        assert_eq!(
            state,
            DashboardState::Error {
                failure: DashboardFailure::Persistence("connection reset".to_string())
            }
        );
    }

    #[test]
    fn submit_is_rejected_while_in_flight() {
        for events in [
            vec![DashboardEvent::Submit],
            vec![DashboardEvent::Submit, DashboardEvent::ValidationPassed],
            vec![
                DashboardEvent::Submit,
                DashboardEvent::ValidationPassed,
                DashboardEvent::WeatherFetched,
            ],
        ] {
            let state = run(events).unwrap();
            assert!(state.is_in_flight());
            assert!(!state.can_submit());
            let err = state.apply(DashboardEvent::Submit).unwrap_err();
            assert_eq!(err.event, "submit");
        }
    }

    #[test]
    fn success_does_not_accept_submit() {
        let state = DashboardState::Success;
        assert!(!state.is_in_flight());
        assert!(state.apply(DashboardEvent::Submit).is_err());
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let err = DashboardState::default()
            .apply(DashboardEvent::PersistSucceeded)
            .unwrap_err();
        assert_eq!(err.state, "idle");
        assert_eq!(err.event, "persist_succeeded");
    }

    #[test]
    fn state_serializes_with_tag() {
        let state = DashboardState::Error {
            failure: DashboardFailure::Gateway("Weather service unavailable".to_string()),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "error");
        assert_eq!(json["failure"]["kind"], "gateway");
    }
}
