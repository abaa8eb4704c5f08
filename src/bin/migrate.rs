use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::error::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use degenz_hub_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Reads .env and DATABASE_URL
    let config = ApiConfig::from_env();

    tracing::info!("Running database migrations...");

    let connection = Database::connect(&config.database_url).await?;

    Migrator::up(&connection, None).await?;

    tracing::info!("Migrations completed successfully!");

    Ok(())
}
