// Payment ledger persistence

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::db::error::DbError;
use crate::entity::prelude::Payments;
use crate::entity::{payments, ref_earnings};

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_CONFIRMED: &str = "confirmed";

/// Payment row as submitted by the client
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i32,
    pub chain: String,
    pub tx_hash: String,
    pub token_symbol: String,
    pub amount: String,
    pub usd_equiv_cents: i64,
    pub feature_type: String,
    pub status: String,
}

/// Referral commission owed to `referrer_id` for the payment being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionRow {
    pub referrer_id: i32,
    pub amount_cents: i64,
}

/// Repository for payments and the commissions they generate
pub struct PaymentRepository {
    conn: DatabaseConnection,
}

impl PaymentRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<payments::Model>, DbError> {
        Payments::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_tx_hash(&self, tx_hash: &str) -> Result<Option<payments::Model>, DbError> {
        Payments::find()
            .filter(payments::Column::TxHash.eq(tx_hash))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Finds a payment only if it belongs to `user_id`
    pub async fn find_for_user(
        &self,
        payment_id: i32,
        user_id: i32,
    ) -> Result<Option<payments::Model>, DbError> {
        Payments::find_by_id(payment_id)
            .filter(payments::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Looks up the payment a client claims to have made for a feature
    pub async fn find_for_verification(
        &self,
        user_id: i32,
        tx_hash: &str,
        feature_type: &str,
    ) -> Result<Option<payments::Model>, DbError> {
        Payments::find()
            .filter(payments::Column::UserId.eq(user_id))
            .filter(payments::Column::TxHash.eq(tx_hash))
            .filter(payments::Column::FeatureType.eq(feature_type))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Inserts the payment and, when present, its referral commission in one transaction.
    ///
    /// A reused tx hash fails with `DbError::Conflict` and leaves nothing behind.
    pub async fn insert_with_commission(
        &self,
        new_payment: NewPayment,
        commission: Option<CommissionRow>,
    ) -> Result<payments::Model, DbError> {
        let txn = self.conn.begin().await?;
        let now = Utc::now();

        let payment = payments::ActiveModel {
            user_id: Set(new_payment.user_id),
            chain: Set(new_payment.chain),
            tx_hash: Set(new_payment.tx_hash),
            token_symbol: Set(new_payment.token_symbol),
            amount: Set(new_payment.amount),
            usd_equiv_cents: Set(new_payment.usd_equiv_cents),
            feature_type: Set(new_payment.feature_type),
            status: Set(new_payment.status),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if let Some(commission) = commission {
            ref_earnings::ActiveModel {
                referrer_id: Set(commission.referrer_id),
                referred_id: Set(payment.user_id),
                payment_id: Set(payment.id),
                amount_cents: Set(commission.amount_cents),
                paid_out: Set(false),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(payment)
    }

    /// Moves a payment from `from` to `to`.
    ///
    /// Returns false when the stored status is no longer `from`.
    pub async fn update_status(
        &self,
        payment_id: i32,
        from: &str,
        to: &str,
    ) -> Result<bool, DbError> {
        let result = Payments::update_many()
            .col_expr(payments::Column::Status, Expr::value(to))
            .filter(payments::Column::Id.eq(payment_id))
            .filter(payments::Column::Status.eq(from))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<payments::Model>, DbError> {
        Payments::find()
            .filter(payments::Column::UserId.eq(user_id))
            .order_by_desc(payments::Column::CreatedAt)
            .order_by_desc(payments::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Sum of every payment the user has recorded, in cents
    pub async fn total_spent_cents(&self, user_id: i32) -> Result<i64, DbError> {
        let amounts: Vec<i64> = Payments::find()
            .select_only()
            .column(payments::Column::UsdEquivCents)
            .filter(payments::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(amounts.iter().sum())
    }
}
