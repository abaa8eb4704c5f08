// HTTP handlers and the state they share

pub mod ai;
pub mod contests;
pub mod health;
pub mod payments;
pub mod pricing;
pub mod referrals;
pub mod users;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::ApiConfig;
use crate::db::Repositories;
use crate::infrastructure::api::OpenRouterClient;

/// Shared state handed to every handler
pub struct HubState {
    pub db: DatabaseConnection,
    pub repositories: Repositories,
    pub config: ApiConfig,
    pub ai_client: OpenRouterClient,
}

// Type alias for the application state
pub type AppState = Arc<HubState>;
