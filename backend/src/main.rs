//! Crop Stress Monitoring - Backend Server
//!
//! Records farmers' crop cycles, scores them against current weather and
//! forwards stress predictions to the prediction service.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use external::{PredictionClient, WeatherClient, WeatherGateway};
use services::{CropCycleService, DashboardController, SessionRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub weather: Arc<dyn WeatherGateway>,
    pub predictions: PredictionClient,
    pub dashboard: DashboardController,
}

impl AppState {
    /// Wire the gateways and the dashboard controller around a pool
    pub fn new(db: sqlx::PgPool, config: Config) -> error::AppResult<Self> {
        let weather: Arc<dyn WeatherGateway> = Arc::new(WeatherClient::new(
            config.weather.api_key.clone(),
            config.weather.api_endpoint.clone(),
            config.weather.timeout(),
        )?);
        let predictions = PredictionClient::new(
            config.prediction.endpoint.clone(),
            config.prediction.timeout(),
        )?;
        let dashboard = DashboardController::new(
            weather.clone(),
            Arc::new(CropCycleService::new(db.clone())),
            SessionRegistry::new(config.dashboard.success_display()),
        );

        Ok(Self {
            db,
            config: Arc::new(config),
            weather,
            predictions,
            dashboard,
        })
    }
}

fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cropwatch_server=debug,tower_http=debug,sqlx=warn".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    init_tracing(&config.log_format);

    tracing::info!("Starting Crop Stress Monitoring Server");
    tracing::info!("Environment: {}", config.environment);

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db_pool, config)?;

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> Json<Value> {
    Json(json!({ "message": "Crop Stress API is running" }))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
