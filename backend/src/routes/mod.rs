//! Route definitions for the crop stress backend

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        .merge(protected_routes(state))
}

/// Everything that needs a signed-in farmer
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/crop-cycles", crop_cycle_routes())
        .nest("/dashboard", dashboard_routes())
        .route("/weather/current", get(handlers::get_current_weather))
        .route("/predictions", post(handlers::predict_stress))
        .nest("/seasons", season_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn crop_cycle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_crop_cycles).post(handlers::submit_crop_cycle),
        )
        .route("/:cycle_id", get(handlers::get_crop_cycle))
}

fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/state", get(handlers::get_dashboard_state))
        .route("/acknowledge", post(handlers::acknowledge_dashboard))
}

fn season_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_seasons))
        .route("/detect", post(handlers::detect_season))
}
