// Users keyed by Farcaster id, and their profile summary

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::repositories::UserChanges;
use crate::db::DbError;
use crate::entity::{ai_jobs, meme_packs, users};
use crate::error::{HubError, HubResult};
use crate::handlers::AppState;
use crate::models::UpsertUserRequest;
use crate::services::contest_service::EntryView;
use crate::services::money::from_cents;
use crate::services::payment_service::PaymentView;
use crate::services::validation::validate_fid;

const RECENT_ACTIVITY_LIMIT: u64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub fid: i64,
    pub username: Option<String>,
    pub evm_wallet: Option<String>,
    pub sol_wallet: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for UserView {
    fn from(m: users::Model) -> Self {
        Self {
            id: m.id,
            fid: m.fid,
            username: m.username,
            evm_wallet: m.evm_wallet,
            sol_wallet: m.sol_wallet,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiJobView {
    pub id: i32,
    pub user_id: i32,
    pub payment_id: i32,
    pub feature_type: String,
    pub model_used: String,
    pub input_prompt: String,
    pub output_ref: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price_usd: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<ai_jobs::Model> for AiJobView {
    fn from(m: ai_jobs::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            payment_id: m.payment_id,
            feature_type: m.feature_type,
            model_used: m.model_used,
            input_prompt: m.input_prompt,
            output_ref: m.output_ref,
            price_usd: from_cents(m.price_cents),
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemePackView {
    pub id: i32,
    pub user_id: i32,
    pub category: String,
    pub title: String,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<meme_packs::Model> for MemePackView {
    fn from(m: meme_packs::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            category: m.category,
            title: m.title,
            data: m.data,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnteredContest {
    pub title: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    #[serde(flatten)]
    pub entry: EntryView,
    pub contest: Option<EnteredContest>,
    pub vote_count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileStats {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_earned: Decimal,
    pub ai_jobs_count: u64,
    pub contests_created: u64,
    pub contests_entered: u64,
    pub meme_packs_created: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub ai_jobs: Vec<AiJobView>,
    pub payments: Vec<PaymentView>,
    pub meme_packs: Vec<MemePackView>,
    pub contest_entries: Vec<ProfileEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserView,
    pub stats: ProfileStats,
    pub recent_activity: RecentActivity,
    pub referral_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserView,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Creates the user for a fid, or updates the supplied fields (POST /api/users)
pub async fn upsert_user(state: &AppState, req: UpsertUserRequest) -> HubResult<UserResponse> {
    let fid = req
        .fid
        .ok_or_else(|| HubError::InvalidRequest("Missing required fields".to_string()))?;
    validate_fid(fid)
        .into_result()
        .map_err(HubError::InvalidRequest)?;

    let changes = UserChanges {
        username: non_empty(req.username),
        evm_wallet: non_empty(req.evm_wallet),
        sol_wallet: non_empty(req.sol_wallet),
    };
    let repo = &state.repositories.user;

    let user = match repo.find_by_fid(fid).await? {
        Some(existing) => repo.update(existing, changes).await?,
        None => match repo.insert(fid, changes.clone()).await {
            Ok(user) => {
                tracing::info!("Registered user {} for fid {}", user.id, fid);
                user
            }
            // Another request registered the same fid first
            Err(DbError::Conflict(_)) => {
                let existing = repo
                    .find_by_fid(fid)
                    .await?
                    .ok_or_else(|| HubError::InternalError(format!("fid {} vanished", fid)))?;
                repo.update(existing, changes).await?
            }
            Err(e) => return Err(e.into()),
        },
    };

    Ok(UserResponse { user: user.into() })
}

/// Aggregates a user's spending, earnings and recent activity (GET /api/users/profile)
pub async fn get_profile(state: &AppState, user_id: Option<i32>) -> HubResult<ProfileResponse> {
    let user_id =
        user_id.ok_or_else(|| HubError::InvalidRequest("User ID required".to_string()))?;
    let repos = &state.repositories;

    let user = repos
        .user
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("User not found".to_string()))?;

    let total_spent_cents = repos.payment.total_spent_cents(user_id).await?;
    let total_earned_cents: i64 = repos
        .referral
        .earnings_for_referrer(user_id)
        .await?
        .iter()
        .map(|e| e.amount_cents)
        .sum();

    let ai_jobs = repos
        .ai_job
        .recent_jobs_for_user(user_id, RECENT_ACTIVITY_LIMIT)
        .await?;
    let payments = repos
        .payment
        .recent_for_user(user_id, RECENT_ACTIVITY_LIMIT)
        .await?;
    let meme_packs = repos
        .ai_job
        .recent_packs_for_user(user_id, RECENT_ACTIVITY_LIMIT)
        .await?;

    let entries = repos.contest.entries_by_user(user_id).await?;
    let contest_ids: Vec<i32> = entries.iter().map(|e| e.contest_id).collect();
    let entry_ids: Vec<i32> = entries.iter().map(|e| e.id).collect();
    // A user enters each contest at most once
    let mut contests: HashMap<i32, EnteredContest> = repos
        .contest
        .find_many(&contest_ids)
        .await?
        .into_iter()
        .map(|c| {
            (
                c.id,
                EnteredContest {
                    title: c.title,
                    status: c.status,
                },
            )
        })
        .collect();
    let votes = repos.contest.vote_counts_for_entries(&entry_ids).await?;

    let stats = ProfileStats {
        total_spent: from_cents(total_spent_cents),
        total_earned: from_cents(total_earned_cents),
        ai_jobs_count: repos.ai_job.count_jobs_for_user(user_id).await?,
        contests_created: repos.contest.count_created_by(user_id).await?,
        contests_entered: entries.len() as u64,
        meme_packs_created: repos.ai_job.count_packs_for_user(user_id).await?,
    };

    let contest_entries = entries
        .into_iter()
        .map(|e| ProfileEntry {
            vote_count: votes.get(&e.id).copied().unwrap_or(0),
            contest: contests.remove(&e.contest_id),
            entry: e.into(),
        })
        .collect();

    let referral_code = repos
        .referral
        .find_by_user(user_id)
        .await?
        .map(|r| r.code);

    Ok(ProfileResponse {
        user: user.into(),
        stats,
        recent_activity: RecentActivity {
            ai_jobs: ai_jobs.into_iter().map(AiJobView::from).collect(),
            payments: payments.into_iter().map(PaymentView::from).collect(),
            meme_packs: meme_packs.into_iter().map(MemePackView::from).collect(),
            contest_entries,
        },
        referral_code,
    })
}
