// AI generation jobs and the meme packs they produce

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::db::error::DbError;
use crate::entity::prelude::{AiJobs, MemePacks};
use crate::entity::{ai_jobs, meme_packs};

#[derive(Debug, Clone)]
pub struct NewAiJob {
    pub user_id: i32,
    pub payment_id: i32,
    pub feature_type: String,
    pub model_used: String,
    pub input_prompt: String,
    pub output_ref: String,
    pub price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct NewMemePack {
    pub category: String,
    pub title: String,
    pub data: serde_json::Value,
}

/// Repository for AI jobs and meme packs
pub struct AiJobRepository {
    conn: DatabaseConnection,
}

impl AiJobRepository {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn find_by_payment(&self, payment_id: i32) -> Result<Option<ai_jobs::Model>, DbError> {
        AiJobs::find()
            .filter(ai_jobs::Column::PaymentId.eq(payment_id))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Stores a job and its optional meme pack together.
    /// A second job for the same payment fails with `DbError::Conflict`.
    pub async fn insert_job_with_pack(
        &self,
        job: NewAiJob,
        pack: Option<NewMemePack>,
    ) -> Result<(ai_jobs::Model, Option<meme_packs::Model>), DbError> {
        let txn = self.conn.begin().await?;
        let now = Utc::now();

        let job = ai_jobs::ActiveModel {
            user_id: Set(job.user_id),
            payment_id: Set(job.payment_id),
            feature_type: Set(job.feature_type),
            model_used: Set(job.model_used),
            input_prompt: Set(job.input_prompt),
            output_ref: Set(job.output_ref),
            price_cents: Set(job.price_cents),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let pack = match pack {
            Some(pack) => Some(
                meme_packs::ActiveModel {
                    user_id: Set(job.user_id),
                    category: Set(pack.category),
                    title: Set(pack.title),
                    data: Set(pack.data),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?,
            ),
            None => None,
        };

        txn.commit().await?;
        Ok((job, pack))
    }

    pub async fn recent_jobs_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<ai_jobs::Model>, DbError> {
        AiJobs::find()
            .filter(ai_jobs::Column::UserId.eq(user_id))
            .order_by_desc(ai_jobs::Column::CreatedAt)
            .order_by_desc(ai_jobs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn count_jobs_for_user(&self, user_id: i32) -> Result<u64, DbError> {
        AiJobs::find()
            .filter(ai_jobs::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn recent_packs_for_user(
        &self,
        user_id: i32,
        limit: u64,
    ) -> Result<Vec<meme_packs::Model>, DbError> {
        MemePacks::find()
            .filter(meme_packs::Column::UserId.eq(user_id))
            .order_by_desc(meme_packs::Column::CreatedAt)
            .order_by_desc(meme_packs::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn count_packs_for_user(&self, user_id: i32) -> Result<u64, DbError> {
        MemePacks::find()
            .filter(meme_packs::Column::UserId.eq(user_id))
            .count(&self.conn)
            .await
            .map_err(Into::into)
    }
}
