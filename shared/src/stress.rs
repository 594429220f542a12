//! Rule-based crop stress evaluation
//!
//! Each factor category adds a fixed number of points and one explanation;
//! the total is clamped to 0-100 and bucketed into a [`StressLevel`].

use crate::models::{
    CropCycleRecord, CropType, Season, SoilType, StressAssessment, StressLevel, WeatherSnapshot,
};

pub const HEAT_STRESS_CELSIUS: f64 = 35.0;
pub const COLD_STRESS_CELSIUS: f64 = 10.0;
pub const LOW_HUMIDITY_PERCENT: f64 = 30.0;
pub const HIGH_HUMIDITY_PERCENT: f64 = 90.0;
pub const WATERLOGGING_RAINFALL_MM: f64 = 100.0;

/// Seasons each crop grows best in. Crops not listed get no season factor.
pub const OPTIMAL_SEASONS: &[(CropType, &[Season])] = &[
    (CropType::Rice, &[Season::Monsoon]),
    (CropType::Wheat, &[Season::Winter]),
    (CropType::Maize, &[Season::Monsoon, Season::Summer]),
    (CropType::Cotton, &[Season::Summer, Season::Monsoon]),
    (CropType::Soybean, &[Season::Monsoon]),
    (CropType::Groundnut, &[Season::Monsoon, Season::Summer]),
    (CropType::Millet, &[Season::Summer, Season::Monsoon]),
];

pub fn optimal_seasons(crop: CropType) -> Option<&'static [Season]> {
    OPTIMAL_SEASONS
        .iter()
        .find(|(c, _)| *c == crop)
        .map(|(_, seasons)| *seasons)
}

/// A single scoring rule outcome
struct Factor {
    points: i32,
    note: String,
}

fn soil_factor(soil: SoilType) -> Factor {
    match soil {
        SoilType::Sandy => Factor {
            points: 20,
            note: "Sandy soil drains fast and holds little water".to_string(),
        },
        SoilType::Clay => Factor {
            points: 15,
            note: "Clay soil is prone to compaction and poor drainage".to_string(),
        },
        other => Factor {
            points: 5,
            note: format!("{} soil offers balanced drainage and water retention", other),
        },
    }
}

fn temperature_factor(temp: f64) -> Factor {
    if temp > HEAT_STRESS_CELSIUS {
        Factor {
            points: 25,
            note: format!("Heat stress: {:.1}°C is above {}°C", temp, HEAT_STRESS_CELSIUS),
        }
    } else if temp < COLD_STRESS_CELSIUS {
        Factor {
            points: 20,
            note: format!("Cold stress: {:.1}°C is below {}°C", temp, COLD_STRESS_CELSIUS),
        }
    } else {
        Factor {
            points: 0,
            note: format!("Temperature {:.1}°C is within the safe range", temp),
        }
    }
}

fn humidity_factor(humidity: f64) -> Factor {
    if humidity < LOW_HUMIDITY_PERCENT {
        Factor {
            points: 20,
            note: format!("Low humidity ({:.0}%) increases water loss", humidity),
        }
    } else if humidity > HIGH_HUMIDITY_PERCENT {
        Factor {
            points: 15,
            note: format!("Very high humidity ({:.0}%) favours fungal disease", humidity),
        }
    } else {
        Factor {
            points: 0,
            note: format!("Humidity {:.0}% is within the normal range", humidity),
        }
    }
}

fn rainfall_factor(rainfall: f64, season: Season) -> Option<Factor> {
    if rainfall > WATERLOGGING_RAINFALL_MM {
        Some(Factor {
            points: 15,
            note: format!("Waterlogging risk: {:.1}mm of rainfall", rainfall),
        })
    } else if rainfall == 0.0 && season != Season::Winter {
        Some(Factor {
            points: 15,
            note: format!("Drought risk: no rainfall during the {} season", season),
        })
    } else {
        None
    }
}

fn season_factor(crop: CropType, season: Season) -> Option<Factor> {
    let seasons = optimal_seasons(crop)?;
    if seasons.contains(&season) {
        Some(Factor {
            points: 0,
            note: format!("{} is well suited to the {} season", crop, season),
        })
    } else {
        let names: Vec<&str> = seasons.iter().map(Season::as_str).collect();
        Some(Factor {
            points: 10,
            note: format!(
                "{} is off-season in {} (best grown in {})",
                crop,
                season,
                names.join(" or ")
            ),
        })
    }
}

/// Clamp a raw point total into the 0-100 score range
pub fn clamp_score(total: i32) -> u8 {
    total.clamp(0, 100) as u8
}

/// Score a validated crop cycle against current weather
pub fn evaluate_stress(record: &CropCycleRecord, weather: &WeatherSnapshot) -> StressAssessment {
    let factors: Vec<Factor> = [
        Some(soil_factor(record.soil_type)),
        Some(temperature_factor(weather.temp)),
        Some(humidity_factor(weather.humidity)),
        rainfall_factor(weather.rainfall, record.season),
        season_factor(record.crop_type, record.season),
    ]
    .into_iter()
    .flatten()
    .collect();

    let total: i32 = factors.iter().map(|f| f.points).sum();
    let score = clamp_score(total);

    StressAssessment {
        score,
        level: StressLevel::from_score(score),
        factors: factors.into_iter().map(|f| f.note).collect(),
    }
}
