//! Marketplace Discovery Backend
//!
//! Serves curated resource collections and creator rankings from SQLite.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod service;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{DiscoveryStore, Repository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DiscoveryStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Marketplace Discovery Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let state = AppState {
        store: Arc::new(Repository::new(pool)),
    };

    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Every route is a public read.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let discovery_routes = Router::new()
        // Resource collections
        .route(
            "/resources/selection-of-week",
            get(api::get_selection_of_week),
        )
        .route("/resources/hidden-gems", get(api::get_hidden_gems))
        .route("/resources/starter-pack", get(api::get_starter_pack))
        .route("/resources/theme-of-month", get(api::get_theme_of_month))
        .route(
            "/resources/most-downloaded",
            get(api::get_most_downloaded),
        )
        // Creators
        .route(
            "/creators/weekly-leaderboard",
            get(api::get_weekly_leaderboard),
        )
        .route(
            "/creators/top-by-category",
            get(api::get_top_creators_by_category),
        )
        .route("/creators/shuffle", get(api::get_random_creators));

    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/discovery", discovery_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
