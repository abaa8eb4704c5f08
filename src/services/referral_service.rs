// Referral codes and the commissions they earn

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::REFERRAL_CODE_MAX_ATTEMPTS;
use crate::db::DbError;
use crate::entity::ref_earnings;
use crate::error::{HubError, HubResult};
use crate::handlers::AppState;
use crate::services::money::from_cents;
use crate::services::validation::generate_default_referral_code;

#[derive(Debug, Serialize)]
pub struct ReferralCodeResponse {
    pub code: String,
    pub id: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningView {
    pub id: i32,
    pub referrer_id: i32,
    pub referred_id: i32,
    pub payment_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub paid_out: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ref_earnings::Model> for EarningView {
    fn from(m: ref_earnings::Model) -> Self {
        Self {
            id: m.id,
            referrer_id: m.referrer_id,
            referred_id: m.referred_id,
            payment_id: m.payment_id,
            amount: from_cents(m.amount_cents),
            paid_out: m.paid_out,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub earnings: Vec<EarningView>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_earned: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_paid_out: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pending: Decimal,
}

/// Returns the user's referral code, creating one on first call (POST /api/referrals)
pub async fn get_or_create_code(
    state: &AppState,
    user_id: Option<i32>,
) -> HubResult<ReferralCodeResponse> {
    let user_id =
        user_id.ok_or_else(|| HubError::InvalidRequest("User ID required".to_string()))?;
    let repos = &state.repositories;

    if let Some(existing) = repos.referral.find_by_user(user_id).await? {
        return Ok(ReferralCodeResponse {
            code: existing.code,
            id: existing.id,
        });
    }

    if repos.user.find_by_id(user_id).await?.is_none() {
        return Err(HubError::NotFound("User not found".to_string()));
    }

    for attempt in 1..=REFERRAL_CODE_MAX_ATTEMPTS {
        let candidate = generate_default_referral_code();
        if repos.referral.code_exists(&candidate).await? {
            tracing::debug!("Referral code collision on attempt {}", attempt);
            continue;
        }

        match repos.referral.insert(user_id, &candidate).await {
            Ok(created) => {
                tracing::info!("Created referral code for user {}", user_id);
                return Ok(ReferralCodeResponse {
                    code: created.code,
                    id: created.id,
                });
            }
            Err(DbError::Conflict(_)) => {
                // A concurrent request may have created this user's code
                if let Some(existing) = repos.referral.find_by_user(user_id).await? {
                    return Ok(ReferralCodeResponse {
                        code: existing.code,
                        id: existing.id,
                    });
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(HubError::InternalError(format!(
        "Failed to generate a unique referral code after {} attempts",
        REFERRAL_CODE_MAX_ATTEMPTS
    )))
}

/// Summarises commissions earned as a referrer (GET /api/referrals/earnings)
pub async fn get_earnings(state: &AppState, user_id: Option<i32>) -> HubResult<EarningsResponse> {
    let user_id =
        user_id.ok_or_else(|| HubError::InvalidRequest("User ID required".to_string()))?;

    let rows = state
        .repositories
        .referral
        .earnings_for_referrer(user_id)
        .await?;

    let earned_cents: i64 = rows.iter().map(|e| e.amount_cents).sum();
    let paid_cents: i64 = rows
        .iter()
        .filter(|e| e.paid_out)
        .map(|e| e.amount_cents)
        .sum();

    Ok(EarningsResponse {
        earnings: rows.into_iter().map(EarningView::from).collect(),
        total_earned: from_cents(earned_cents),
        total_paid_out: from_cents(paid_cents),
        pending: from_cents(earned_cents - paid_cents),
    })
}
