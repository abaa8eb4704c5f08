// DEGENZ hub API server entry point

use std::net::SocketAddr;

use migration::{Migrator, MigratorTrait};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use degenz_hub_api::config::ApiConfig;
use degenz_hub_api::db::DbPool;
use degenz_hub_api::{build_router, build_state};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    // Configure logging with tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load API configuration from environment
    let config = ApiConfig::from_env();
    tracing::info!("Configuration loaded");
    if config.openrouter_api_key.is_empty() {
        tracing::warn!("OPENROUTER_API_KEY is not set; AI generation will be unavailable");
    }

    // Establish database connection pool
    let db_pool = DbPool::new(&config)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    if config.run_migrations {
        Migrator::up(db_pool.get_connection(), None)
            .await
            .expect("Failed to run migrations");
        tracing::info!("Migrations applied");
    }

    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");

    let state = build_state(db_pool.get_connection().clone(), config)
        .expect("Failed to build HTTP client");
    let app = build_router(state);

    // Start HTTP server
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
