//! Tests for season detection and the season selector

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use shared::{
    detect_season, detect_season_from_str, season_for_month, Season, SeasonSelector, SeasonSource,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod detection {
    use super::*;

    #[test]
    fn month_bands() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Summer),
            (5, Season::Summer),
            (6, Season::Monsoon),
            (9, Season::Monsoon),
            (10, Season::Winter),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(detect_season(date(2024, month, 15)), season, "month {}", month);
        }
    }

    #[test]
    fn band_edges() {
        assert_eq!(detect_season(date(2024, 2, 29)), Season::Winter);
        assert_eq!(detect_season(date(2024, 3, 1)), Season::Summer);
        assert_eq!(detect_season(date(2024, 5, 31)), Season::Summer);
        assert_eq!(detect_season(date(2024, 6, 1)), Season::Monsoon);
        assert_eq!(detect_season(date(2024, 9, 30)), Season::Monsoon);
        assert_eq!(detect_season(date(2024, 10, 1)), Season::Winter);
    }

    #[test]
    fn unparseable_dates_detect_nothing() {
        assert_eq!(detect_season_from_str(""), None);
        assert_eq!(detect_season_from_str("2024-13-01"), None);
        assert_eq!(detect_season_from_str("yesterday"), None);
        assert_eq!(detect_season_from_str("2024-07-04"), Some(Season::Monsoon));
    }

    #[test]
    fn invalid_month_has_no_season() {
        assert_eq!(season_for_month(0), None);
        assert_eq!(season_for_month(13), None);
    }

    proptest! {
        #[test]
        fn prop_detection_depends_only_on_month(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let d = date(year, month, day);
            prop_assert_eq!(Some(detect_season(d)), season_for_month(d.month()));
            prop_assert_eq!(detect_season(d), detect_season(date(2000, month, 1)));
        }
    }
}

mod selector {
    use super::*;

    #[test]
    fn follows_the_sowing_date() {
        let mut selector = SeasonSelector::new();
        assert_eq!(selector.season(), None);

        selector.set_sowing_date("2024-11-05");
        assert_eq!(selector.season(), Some(Season::Winter));
        assert_eq!(selector.source(), SeasonSource::Auto);

        selector.set_sowing_date("2024-04-05");
        assert_eq!(selector.season(), Some(Season::Summer));
    }

    #[test]
    fn manual_override_sticks_until_reset() {
        let mut selector = SeasonSelector::new();
        selector.set_sowing_date("2024-07-01");
        selector.select_manually(Season::Summer);
        assert_eq!(selector.season(), Some(Season::Summer));
        assert_eq!(selector.source(), SeasonSource::Manual);

        selector.set_sowing_date("2024-12-01");
        assert_eq!(selector.season(), Some(Season::Summer));

        selector.reset_to_auto();
        assert_eq!(selector.season(), Some(Season::Winter));
        assert_eq!(selector.source(), SeasonSource::Auto);
    }

    #[test]
    fn offers_exactly_three_seasons() {
        let names: Vec<&str> = Season::ALL.iter().map(Season::as_str).collect();
        assert_eq!(names, vec!["Summer", "Winter", "Monsoon"]);
    }
}
