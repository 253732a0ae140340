use adminapi::{
    api::{self, AppState},
    config::AppConfig,
};
use anyhow::Context;
use axum::http::{HeaderValue, Method, header::CONTENT_TYPE};
use dotenvy::dotenv;
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adminapi=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    info!("🚀 Starting adminapi");

    // Connect to database
    info!("Connecting to database...");
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .connect_timeout(config.read_timeout)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;
    info!("Database connected successfully");

    let state = AppState::new(db.clone(), config.password_hash_cost);

    // Setup CORS
    let cors = if config.cors_origins.trim() == "*" {
        warn!("🚨 CORS set to accept ANY origin (*) - only use in development!");
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::PUT, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
    };

    let app = api::with_request_timeout(api::router(state), config.request_timeout())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!("🚀 Server starting on http://{}", config.addr);
    info!("🏥 Health check available at http://{}/health", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped, closing database pool");
    db.close().await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", err);
    }
}
