//! Crop-cycle persistence

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{
    CropCycleRecord, CropType, GpsCoordinates, Location, Pagination, Season, SeasonSource,
    SoilType, StoredCropCycle, StressAssessment, StressLevel, WeatherSnapshot,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A crop cycle ready to be written
#[derive(Debug, Clone)]
pub struct NewCropCycle {
    pub user_id: Uuid,
    pub record: CropCycleRecord,
    pub season_source: SeasonSource,
    pub weather: WeatherSnapshot,
    pub assessment: StressAssessment,
}

/// Storage for evaluated crop cycles
#[async_trait]
pub trait CropCycleStore: Send + Sync {
    async fn store(&self, cycle: NewCropCycle) -> AppResult<StoredCropCycle>;

    async fn get(&self, user_id: Uuid, cycle_id: Uuid) -> AppResult<StoredCropCycle>;

    /// Newest first, with the user's total count
    async fn list(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AppResult<(Vec<StoredCropCycle>, u64)>;
}

/// Postgres-backed crop-cycle store
#[derive(Clone)]
pub struct CropCycleService {
    db: PgPool,
}

/// Database row for a crop cycle
#[derive(Debug, FromRow)]
struct CropCycleRow {
    id: Uuid,
    user_id: Uuid,
    crop_type: String,
    soil_type: String,
    sowing_date: NaiveDate,
    season: String,
    season_source: String,
    village: String,
    latitude: Option<Decimal>,
    longitude: Option<Decimal>,
    temperature_c: f64,
    humidity_percent: f64,
    rainfall_mm: f64,
    wind_speed_kmh: f64,
    stress_score: i16,
    stress_level: String,
    stress_factors: serde_json::Value,
    created_at: DateTime<Utc>,
}

impl TryFrom<CropCycleRow> for StoredCropCycle {
    type Error = AppError;

    fn try_from(row: CropCycleRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, value: &str| {
            AppError::Internal(format!("Stored crop cycle {} has invalid {}: {}", row.id, what, value))
        };

        let crop_type = CropType::parse(&row.crop_type)
            .ok_or_else(|| corrupt("crop type", &row.crop_type))?;
        let soil_type = SoilType::parse(&row.soil_type)
            .ok_or_else(|| corrupt("soil type", &row.soil_type))?;
        let season = Season::parse(&row.season).ok_or_else(|| corrupt("season", &row.season))?;
        let season_source = match row.season_source.as_str() {
            "manual" => SeasonSource::Manual,
            "auto" => SeasonSource::Auto,
            other => return Err(corrupt("season source", other)),
        };
        let level = StressLevel::parse(&row.stress_level)
            .ok_or_else(|| corrupt("stress level", &row.stress_level))?;
        let factors: Vec<String> = serde_json::from_value(row.stress_factors.clone())
            .map_err(|e| corrupt("stress factors", &e.to_string()))?;
        let score = u8::try_from(row.stress_score)
            .map_err(|_| corrupt("stress score", &row.stress_score.to_string()))?;

        let coordinates = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(GpsCoordinates::new(latitude, longitude)),
            _ => None,
        };

        Ok(StoredCropCycle {
            id: row.id,
            user_id: row.user_id,
            record: CropCycleRecord {
                crop_type,
                soil_type,
                sowing_date: row.sowing_date,
                season,
                location: Location {
                    village: row.village,
                    coordinates,
                },
            },
            season_source,
            weather: WeatherSnapshot {
                temp: row.temperature_c,
                humidity: row.humidity_percent,
                rainfall: row.rainfall_mm,
                wind_speed: row.wind_speed_kmh,
            },
            assessment: StressAssessment {
                score,
                level,
                factors,
            },
            created_at: row.created_at,
        })
    }
}

const CROP_CYCLE_COLUMNS: &str = r#"
    id, user_id, crop_type, soil_type, sowing_date, season, season_source,
    village, latitude, longitude,
    temperature_c, humidity_percent, rainfall_mm, wind_speed_kmh,
    stress_score, stress_level, stress_factors, created_at
"#;

impl CropCycleService {
    /// Create a new CropCycleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CropCycleStore for CropCycleService {
    async fn store(&self, cycle: NewCropCycle) -> AppResult<StoredCropCycle> {
        let NewCropCycle {
            user_id,
            record,
            season_source,
            weather,
            assessment,
        } = cycle;
        let coordinates = record.location.coordinates;

        let row = sqlx::query_as::<_, CropCycleRow>(&format!(
            r#"
            INSERT INTO crop_cycles (
                user_id, crop_type, soil_type, sowing_date, season, season_source,
                village, latitude, longitude,
                temperature_c, humidity_percent, rainfall_mm, wind_speed_kmh,
                stress_score, stress_level, stress_factors
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING {}
            "#,
            CROP_CYCLE_COLUMNS
        ))
        .bind(user_id)
        .bind(record.crop_type.as_str())
        .bind(record.soil_type.as_str())
        .bind(record.sowing_date)
        .bind(record.season.as_str())
        .bind(season_source.as_str())
        .bind(&record.location.village)
        .bind(coordinates.map(|c| c.latitude))
        .bind(coordinates.map(|c| c.longitude))
        .bind(weather.temp)
        .bind(weather.humidity)
        .bind(weather.rainfall)
        .bind(weather.wind_speed)
        .bind(i16::from(assessment.score))
        .bind(assessment.level.as_str())
        .bind(serde_json::json!(assessment.factors))
        .fetch_one(&self.db)
        .await?;

        tracing::info!(
            crop_cycle_id = %row.id,
            user_id = %user_id,
            stress_score = assessment.score,
            "Crop cycle stored"
        );

        row.try_into()
    }

    async fn get(&self, user_id: Uuid, cycle_id: Uuid) -> AppResult<StoredCropCycle> {
        let row = sqlx::query_as::<_, CropCycleRow>(&format!(
            "SELECT {} FROM crop_cycles WHERE id = $1 AND user_id = $2",
            CROP_CYCLE_COLUMNS
        ))
        .bind(cycle_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Crop cycle".to_string()))?;

        row.try_into()
    }

    async fn list(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AppResult<(Vec<StoredCropCycle>, u64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crop_cycles WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        let rows = sqlx::query_as::<_, CropCycleRow>(&format!(
            r#"
            SELECT {}
            FROM crop_cycles
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
            CROP_CYCLE_COLUMNS
        ))
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let cycles = rows
            .into_iter()
            .map(StoredCropCycle::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((cycles, total.max(0) as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> CropCycleRow {
        CropCycleRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            crop_type: "Wheat".to_string(),
            soil_type: "Clay".to_string(),
            sowing_date: NaiveDate::from_ymd_opt(2024, 11, 10).unwrap(),
            season: "Winter".to_string(),
            season_source: "manual".to_string(),
            village: "Rampur".to_string(),
            latitude: Some(Decimal::new(2685, 2)),
            longitude: Some(Decimal::new(8095, 2)),
            temperature_c: 18.5,
            humidity_percent: 55.0,
            rainfall_mm: 0.0,
            wind_speed_kmh: 9.0,
            stress_score: 15,
            stress_level: "Low".to_string(),
            stress_factors: serde_json::json!(["Clay soil is prone to compaction and poor drainage"]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_stored_cycle() {
        let stored = StoredCropCycle::try_from(row()).unwrap();
        assert_eq!(stored.record.crop_type, CropType::Wheat);
        assert_eq!(stored.season_source, SeasonSource::Manual);
        assert_eq!(stored.assessment.level, StressLevel::Low);
        assert_eq!(stored.assessment.factors.len(), 1);
        assert!(stored.record.location.coordinates.is_some());
    }

    #[test]
    fn corrupt_row_is_an_internal_error() {
        let mut bad = row();
        bad.stress_level = "Extreme".to_string();
        assert!(matches!(
            StoredCropCycle::try_from(bad),
            Err(AppError::Internal(_))
        ));
    }
}
