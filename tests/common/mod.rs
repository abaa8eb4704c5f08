#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database};

use degenz_hub_api::build_state;
use degenz_hub_api::config::ApiConfig;
use degenz_hub_api::db::repositories::UserChanges;
use degenz_hub_api::entity::{payments, users};
use degenz_hub_api::handlers::AppState;
use degenz_hub_api::models::RecordPaymentRequest;
use degenz_hub_api::services::payment_service;

/// Fresh in-memory database with every migration applied
pub async fn setup_with_config(config: ApiConfig) -> AppState {
    // One connection: each new sqlite memory connection would be a separate database
    let mut opts = ConnectOptions::new("sqlite::memory:".to_string());
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    build_state(db, config).expect("build state")
}

pub async fn setup() -> AppState {
    setup_with_config(ApiConfig::default()).await
}

pub async fn create_user(state: &AppState, fid: i64) -> users::Model {
    state
        .repositories
        .user
        .insert(
            fid,
            UserChanges {
                username: Some(format!("degen{}", fid)),
                ..Default::default()
            },
        )
        .await
        .expect("insert user")
}

/// EVM-style hash unique per seed
pub fn tx_hash(seed: u32) -> String {
    format!("0x{:064x}", seed)
}

pub fn payment_request(user_id: i32, seed: u32, feature: &str, usd: Decimal) -> RecordPaymentRequest {
    RecordPaymentRequest {
        user_id: Some(user_id),
        chain: Some("Base".to_string()),
        tx_hash: Some(tx_hash(seed)),
        token_symbol: Some("ETH".to_string()),
        amount: Some("0.001".to_string()),
        usd_equiv: Some(usd),
        feature_type: Some(feature.to_string()),
        referral_code: None,
    }
}

pub async fn pay(
    state: &AppState,
    user_id: i32,
    seed: u32,
    feature: &str,
    usd: Decimal,
) -> payments::Model {
    let response = payment_service::record_payment(
        state,
        payment_request(user_id, seed, feature, usd),
    )
    .await
    .expect("record payment");

    state
        .repositories
        .payment
        .find_by_id(response.payment.id)
        .await
        .expect("query payment")
        .expect("payment exists")
}

pub fn usd(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
