//! Season detection from the sowing date
//!
//! Month bands:
//! - March-May: Summer
//! - June-September: Monsoon
//! - October-February: Winter

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Season, SeasonSource};

/// Date formats accepted from the form, tried in order
const SOWING_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Map a calendar month (1-12) to its season
pub fn season_for_month(month: u32) -> Option<Season> {
    match month {
        3..=5 => Some(Season::Summer),
        6..=9 => Some(Season::Monsoon),
        10..=12 | 1..=2 => Some(Season::Winter),
        _ => None,
    }
}

/// Season in which a date falls
pub fn detect_season(date: NaiveDate) -> Season {
    // month() is always 1-12
    season_for_month(date.month()).unwrap_or(Season::Winter)
}

/// Parse a sowing date as typed into the form
pub fn parse_sowing_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    SOWING_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Detect the season for a raw date string; `None` if it cannot be parsed
pub fn detect_season_from_str(raw: &str) -> Option<Season> {
    parse_sowing_date(raw).map(detect_season)
}

/// Season field of the crop-cycle form
///
/// Follows the sowing date until the farmer picks a season by hand. A manual
/// pick sticks across later date changes until [`SeasonSelector::reset_to_auto`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonSelector {
    sowing_date: Option<NaiveDate>,
    detected: Option<Season>,
    manual: Option<Season>,
}

impl SeasonSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new sowing date and re-run detection
    pub fn set_sowing_date(&mut self, raw: &str) {
        self.sowing_date = parse_sowing_date(raw);
        self.detected = self.sowing_date.map(detect_season);
    }

    pub fn select_manually(&mut self, season: Season) {
        self.manual = Some(season);
    }

    /// Drop the manual pick and go back to the detected season
    pub fn reset_to_auto(&mut self) {
        self.manual = None;
    }

    pub fn season(&self) -> Option<Season> {
        self.manual.or(self.detected)
    }

    pub fn source(&self) -> SeasonSource {
        if self.manual.is_some() {
            SeasonSource::Manual
        } else {
            SeasonSource::Auto
        }
    }

    pub fn sowing_date(&self) -> Option<NaiveDate> {
        self.sowing_date
    }
}
