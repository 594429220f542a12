//! Tests for the dashboard submission state machine

use proptest::prelude::*;
use shared::{DashboardEvent, DashboardFailure, DashboardState};

fn run(events: &[DashboardEvent]) -> DashboardState {
    events
        .iter()
        .cloned()
        .try_fold(DashboardState::default(), DashboardState::apply)
        .unwrap()
}

const TO_PERSISTING: [DashboardEvent; 4] = [
    DashboardEvent::Submit,
    DashboardEvent::ValidationPassed,
    DashboardEvent::WeatherFetched,
    DashboardEvent::Evaluated,
];

#[test]
fn full_cycle_returns_to_idle() {
    let state = run(&TO_PERSISTING);
    assert_eq!(state, DashboardState::Persisting);

    let state = state.apply(DashboardEvent::PersistSucceeded).unwrap();
    assert_eq!(state, DashboardState::Success);
    assert!(!state.can_submit());

    let state = state.apply(DashboardEvent::DisplayTimeout).unwrap();
    assert_eq!(state, DashboardState::Idle { errors: vec![] });
}

#[test]
fn error_allows_resubmission() {
    let state = run(&[
        DashboardEvent::Submit,
        DashboardEvent::ValidationPassed,
        DashboardEvent::WeatherFailed("Weather service unavailable".to_string()),
    ]);
    let state = state.apply(DashboardEvent::Submit).unwrap();
    assert_eq!(state, DashboardState::Validating);
}

#[test]
fn acknowledged_gateway_error_clears_messages() {
    let state = run(&[
        DashboardEvent::Submit,
        DashboardEvent::ValidationPassed,
        DashboardEvent::WeatherFailed("timeout".to_string()),
        DashboardEvent::Acknowledge,
    ]);
    assert_eq!(state, DashboardState::default());
}

#[test]
fn persistence_failure_is_not_a_gateway_failure() {
    let mut events = TO_PERSISTING.to_vec();
    events.push(DashboardEvent::PersistFailed("pool closed".to_string()));
    match run(&events) {
        DashboardState::Error { failure } => {
            assert!(matches!(failure, DashboardFailure::Persistence(_)))
        }
        other => panic!("unexpected state: {:?}", other),
    }
}

fn event_strategy() -> impl Strategy<Value = DashboardEvent> {
    prop_oneof![
        Just(DashboardEvent::Submit),
        Just(DashboardEvent::ValidationPassed),
        Just(DashboardEvent::ValidationFailed(vec!["Season is required".to_string()])),
        Just(DashboardEvent::WeatherFetched),
        Just(DashboardEvent::WeatherFailed("down".to_string())),
        Just(DashboardEvent::Evaluated),
        Just(DashboardEvent::PersistSucceeded),
        Just(DashboardEvent::PersistFailed("down".to_string())),
        Just(DashboardEvent::DisplayTimeout),
        Just(DashboardEvent::Acknowledge),
    ]
}

proptest! {
    /// No event sequence lets a second submission start while one is in flight
    #[test]
    fn prop_submit_never_accepted_in_flight(events in prop::collection::vec(event_strategy(), 0..30)) {
        let mut state = DashboardState::default();
        for event in events {
            let was_in_flight = state.is_in_flight();
            let is_submit = event == DashboardEvent::Submit;
            if let Ok(next) = state.clone().apply(event) {
                prop_assert!(!(was_in_flight && is_submit));
                state = next;
            }
        }
    }

    /// Success is only reachable through Persisting
    #[test]
    fn prop_success_requires_persisting(events in prop::collection::vec(event_strategy(), 0..30)) {
        let mut state = DashboardState::default();
        for event in events {
            let before = state.clone();
            if let Ok(next) = state.clone().apply(event) {
                if next == DashboardState::Success && before != DashboardState::Success {
                    prop_assert_eq!(before, DashboardState::Persisting);
                }
                state = next;
            }
        }
    }
}
