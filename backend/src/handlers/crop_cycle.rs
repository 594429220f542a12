//! HTTP handlers for crop-cycle submission and the dashboard

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{
    CropCycleInput, DashboardState, PaginatedResponse, Pagination, PaginationMeta,
    StoredCropCycle,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::SubmissionOutcome;
use crate::AppState;

/// Validate, score and save a crop cycle
pub async fn submit_crop_cycle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CropCycleInput>,
) -> AppResult<(StatusCode, Json<SubmissionOutcome>)> {
    let outcome = state
        .dashboard
        .submit(&current_user.0.session(), input)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Query parameters for listing crop cycles
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// List the current user's crop cycles, newest first
pub async fn list_crop_cycles(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<StoredCropCycle>>> {
    let pagination = query.pagination();
    let (data, total) = state
        .dashboard
        .store()
        .list(current_user.0.user_id, &pagination)
        .await?;

    Ok(Json(PaginatedResponse {
        data,
        pagination: PaginationMeta::new(&pagination, total),
    }))
}

/// Get one crop cycle by ID
pub async fn get_crop_cycle(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(cycle_id): Path<Uuid>,
) -> AppResult<Json<StoredCropCycle>> {
    let cycle = state
        .dashboard
        .store()
        .get(current_user.0.user_id, cycle_id)
        .await?;
    Ok(Json(cycle))
}

/// Current dashboard state for the session
pub async fn get_dashboard_state(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Json<DashboardState> {
    Json(state.dashboard.state(&current_user.0.session()))
}

/// Dismiss an error shown on the dashboard
pub async fn acknowledge_dashboard(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<DashboardState>> {
    let next = state.dashboard.acknowledge(&current_user.0.session())?;
    Ok(Json(next))
}
