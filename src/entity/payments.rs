//! SeaORM Entity for payments table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub chain: String,
    #[sea_orm(unique)]
    pub tx_hash: String,
    pub token_symbol: String,
    /// Token amount as submitted by the client, e.g. "0.0004"
    pub amount: String,
    pub usd_equiv_cents: i64,
    pub feature_type: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
