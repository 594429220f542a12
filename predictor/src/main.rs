//! Crop Stress Prediction Service
//!
//! Validates prediction inputs, expands them into the model's feature
//! vector and returns the classifier's verdict with per-feature
//! explanations in farmer-friendly terms.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod artifacts;
mod classifier;
mod config;
mod error;
mod features;
mod handlers;
mod service;

use artifacts::ModelArtifacts;
use classifier::RemoteClassifier;
use service::PredictionService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

fn init_tracing(log_format: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stress_predictor=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    init_tracing(&config.log_format);

    tracing::info!("Starting Crop Stress Prediction Service");
    tracing::info!("Environment: {}", config.environment);

    // The service still starts without artifacts; predictions report the model as not loaded
    let artifacts = match ModelArtifacts::load(&config.model.artifact_dir) {
        Ok(artifacts) => Some(artifacts),
        Err(e) => {
            tracing::error!(
                error = %e,
                dir = %config.model.artifact_dir.display(),
                "Failed to load model artifacts"
            );
            None
        }
    };

    let classifier = RemoteClassifier::new(
        &config.model.inference_endpoint,
        config.model.timeout(),
    )?;
    let state = AppState {
        service: Arc::new(PredictionService::new(artifacts, Arc::new(classifier))),
    };

    let app = create_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/predict", post(handlers::predict))
        .route("/api/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
