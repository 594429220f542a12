//! Tests for crop-cycle and prediction input validation

use proptest::prelude::*;
use shared::{
    validate_crop_data, validate_prediction_input, CropCycleInput, CropCycleRecord, CropType,
    LocationInput, PredictionRequest, Season, SeasonSource, SoilType, PREDICTION_INPUT_RULES,
};

fn valid_input() -> CropCycleInput {
    CropCycleInput {
        crop_type: "Cotton".to_string(),
        soil_type: "Black".to_string(),
        sowing_date: "2024-06-18".to_string(),
        season: "Monsoon".to_string(),
        season_source: SeasonSource::Auto,
        location: LocationInput {
            village: "Akola".to_string(),
            lat: Some("20.70".to_string()),
            lng: Some("77.00".to_string()),
        },
    }
}

fn prediction(temperature: f64, rainfall: f64, soil_moisture: f64, pest_damage: f64) -> PredictionRequest {
    PredictionRequest {
        season: "Summer".to_string(),
        crop_type: "Wheat".to_string(),
        temperature,
        rainfall,
        soil_moisture,
        pest_damage,
    }
}

// =============================================================================
// Crop-cycle form
// =============================================================================

mod crop_cycle {
    use super::*;

    #[test]
    fn valid_form_passes_and_converts() {
        let report = validate_crop_data(&valid_input());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());

        let record = CropCycleRecord::try_from(&valid_input()).unwrap();
        assert_eq!(record.crop_type, CropType::Cotton);
        assert_eq!(record.soil_type, SoilType::Black);
        assert_eq!(record.season, Season::Monsoon);
        assert!(record.location.coordinates.is_some());
    }

    #[test]
    fn empty_form_reports_every_field_in_order() {
        let report = validate_crop_data(&CropCycleInput::default());
        assert!(!report.is_valid);
        assert_eq!(
            report.errors,
            vec![
                "Soil type is required",
                "Crop type is required",
                "Sowing date is required",
                "Season is required",
            ]
        );
    }

    #[test]
    fn unknown_values_name_the_allowed_set() {
        let mut input = valid_input();
        input.season = "Spring".to_string();
        input.crop_type = "Barley".to_string();
        let report = validate_crop_data(&input);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("Crop type must be one of:"));
        assert_eq!(report.errors[1], "Season must be one of: Summer, Winter, Monsoon");
    }

    #[test]
    fn coordinates_are_optional_but_checked() {
        let mut input = valid_input();
        input.location.lat = None;
        input.location.lng = None;
        assert!(validate_crop_data(&input).is_valid);

        input.location.lat = Some("north".to_string());
        input.location.lng = Some("200".to_string());
        assert_eq!(
            validate_crop_data(&input).errors,
            vec![
                "Latitude must be a number between -90 and 90",
                "Longitude must be a number between -180 and 180",
            ]
        );
    }

    #[test]
    fn long_village_is_reported_before_coordinates() {
        let mut input = valid_input();
        input.location.village = "v".repeat(256);
        input.location.lng = Some("181".to_string());
        assert_eq!(
            validate_crop_data(&input).errors,
            vec![
                "Village name must be at most 255 characters",
                "Longitude must be a number between -180 and 180",
            ]
        );
    }

    #[test]
    fn validation_does_not_touch_input() {
        let input = valid_input();
        let before = format!("{:?}", input);
        let _ = validate_crop_data(&input);
        assert_eq!(format!("{:?}", input), before);
    }

    #[test]
    fn invalid_form_cannot_become_a_record() {
        let mut input = valid_input();
        input.soil_type.clear();
        assert!(CropCycleRecord::try_from(&input).is_err());
    }

    #[test]
    fn form_accepts_numeric_coordinates() {
        let input: CropCycleInput = serde_json::from_str(
            r#"{"crop_type": "rice", "soil_type": "CLAY", "sowing_date": "2024-08-01",
                "season": "monsoon", "location": {"village": "Puri", "lat": 19.8, "lng": 85.8}}"#,
        )
        .unwrap();
        assert!(validate_crop_data(&input).is_valid);
    }
}

// =============================================================================
// Prediction inputs
// =============================================================================

mod prediction_inputs {
    use super::*;

    #[test]
    fn temperature_seventy_is_rejected_with_range() {
        let err = validate_prediction_input(&prediction(70.0, 10.0, 30.0, 5.0)).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "temperature");
        assert_eq!(err.to_string(), "Temperature must be between -50 and 60°C");
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(validate_prediction_input(&prediction(-50.0, 0.0, 0.0, 0.0)).is_ok());
        assert!(validate_prediction_input(&prediction(60.0, 500.0, 100.0, 100.0)).is_ok());
    }

    #[test]
    fn all_violations_are_joined() {
        let err = validate_prediction_input(&prediction(-51.0, 501.0, -1.0, 101.0)).unwrap_err();
        assert_eq!(err.violations.len(), 4);
        assert_eq!(err.to_string().matches(" | ").count(), 3);
    }

    #[test]
    fn non_finite_values_fail() {
        assert!(validate_prediction_input(&prediction(f64::NAN, 0.0, 0.0, 0.0)).is_err());
        assert!(validate_prediction_input(&prediction(20.0, f64::INFINITY, 0.0, 0.0)).is_err());
    }

    proptest! {
        #[test]
        fn prop_in_range_inputs_pass(
            temperature in -50.0f64..=60.0,
            rainfall in 0.0f64..=500.0,
            soil_moisture in 0.0f64..=100.0,
            pest_damage in 0.0f64..=100.0,
        ) {
            prop_assert!(validate_prediction_input(
                &prediction(temperature, rainfall, soil_moisture, pest_damage)
            ).is_ok());
        }

        #[test]
        fn prop_too_hot_is_always_rejected(temperature in 60.001f64..1000.0) {
            let err = validate_prediction_input(&prediction(temperature, 0.0, 0.0, 0.0)).unwrap_err();
            prop_assert_eq!(err.violations[0].field.as_str(), "temperature");
            prop_assert_eq!(err.violations[0].min, PREDICTION_INPUT_RULES[0].min);
        }
    }
}
