//! DEGENZ hub API: payment ledger, referrals, contests and paid AI generation.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post, Router};
use http::{header, Method};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::ApiConfig;
use db::Repositories;
use handlers::{ai, contests, health, payments, pricing, referrals, users, AppState, HubState};
use infrastructure::api::{OpenRouterClient, UpstreamError};

/// Assembles the shared handler state around a database connection
pub fn build_state(
    db: DatabaseConnection,
    config: ApiConfig,
) -> Result<AppState, UpstreamError> {
    let ai_client = OpenRouterClient::new(&config)?;
    let repositories = Repositories::new(db.clone());

    Ok(Arc::new(HubState {
        db,
        repositories,
        config,
        ai_client,
    }))
}

/// Builds the API router with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    // Configure CORS policy
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/pricing", get(pricing::get_pricing))
        .route("/api/users", post(users::upsert_user))
        .route("/api/users/profile", get(users::get_profile))
        .route("/api/payments", post(payments::record_payment))
        .route("/api/payments/base-pay", post(payments::record_base_pay))
        .route(
            "/api/payments/webhook",
            post(payments::confirm_by_hash).put(payments::confirm_by_id),
        )
        .route("/api/payments/verify", post(payments::verify_payment))
        .route("/api/referrals", post(referrals::get_or_create_code))
        .route("/api/referrals/earnings", get(referrals::get_earnings))
        .route(
            "/api/contests",
            get(contests::list_contests).post(contests::create_contest),
        )
        .route(
            "/api/contests/entries",
            get(contests::list_entries).post(contests::enter_contest),
        )
        .route("/api/contests/votes", post(contests::cast_vote))
        .route("/api/contests/close", post(contests::close_contest))
        .route("/api/ai/generate", post(ai::generate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
