mod calendar;
mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod openapi;
mod startup;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,workweek_axum=debug,tower_http=debug".into());

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    // Create database pool
    let db = db::create_pool(&config.database_url).await.map_err(|e| {
        tracing::error!("Failed to create database pool: {}", e);
        e
    })?;

    tracing::info!("Database pool created successfully");

    sqlx::migrate!().run(&db).await?;
    tracing::info!("Database migrations applied");

    // Initialize metrics recorder
    let metrics_state = Arc::new(handlers::setup_metrics_recorder());
    tracing::info!("Metrics recorder initialized");

    // Create application state
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        metrics: metrics_state,
    });

    // Build router
    let app = startup::build_router(state);

    // Start server
    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
