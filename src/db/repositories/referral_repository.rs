// Referral codes and commission rows

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::sea_query::Expr;

use crate::db::error::DbError;
use crate::entity::prelude::{RefEarnings, Referrals};
use crate::entity::{ref_earnings, referrals};

/// Repository for referral codes and earnings
pub struct ReferralRepository {
    conn: DatabaseConnection,
}

impl ReferralRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<referrals::Model>, DbError> {
        Referrals::find()
            .filter(referrals::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_code(&self, code: &str) -> Result<Option<referrals::Model>, DbError> {
        Referrals::find()
            .filter(referrals::Column::Code.eq(code))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool, DbError> {
        let count = Referrals::find()
            .filter(referrals::Column::Code.eq(code))
            .count(&self.conn)
            .await?;

        Ok(count > 0)
    }

    /// Stores a code for the user. Either unique index may reject it with `DbError::Conflict`.
    pub async fn insert(&self, user_id: i32, code: &str) -> Result<referrals::Model, DbError> {
        referrals::ActiveModel {
            user_id: Set(user_id),
            code: Set(code.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    /// Commission rows earned by `referrer_id`, newest first
    pub async fn earnings_for_referrer(
        &self,
        referrer_id: i32,
    ) -> Result<Vec<ref_earnings::Model>, DbError> {
        RefEarnings::find()
            .filter(ref_earnings::Column::ReferrerId.eq(referrer_id))
            .order_by_desc(ref_earnings::Column::CreatedAt)
            .order_by_desc(ref_earnings::Column::Id)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Flags an earning as paid. Returns false when it was already paid or does not exist.
    pub async fn mark_paid_out(&self, earning_id: i32) -> Result<bool, DbError> {
        let result = RefEarnings::update_many()
            .col_expr(ref_earnings::Column::PaidOut, Expr::value(true))
            .filter(ref_earnings::Column::Id.eq(earning_id))
            .filter(ref_earnings::Column::PaidOut.eq(false))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
