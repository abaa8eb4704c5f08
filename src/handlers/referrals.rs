// Handlers for referral endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use crate::error::HubResult;
use crate::handlers::AppState;
use crate::models::{CreateReferralRequest, UserIdQuery};
use crate::services::referral_service::{self, EarningsResponse, ReferralCodeResponse};

/// Handler for POST /api/referrals - Returns the caller's referral code, creating it if needed
pub async fn get_or_create_code(
    State(state): State<AppState>,
    payload: Result<Json<CreateReferralRequest>, JsonRejection>,
) -> HubResult<Json<ReferralCodeResponse>> {
    let Json(req) = payload?;
    let response = referral_service::get_or_create_code(&state, req.user_id).await?;
    Ok(Json(response))
}

/// Handler for GET /api/referrals/earnings?userId=...
pub async fn get_earnings(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> HubResult<Json<EarningsResponse>> {
    let Query(params) = query?;
    let response = referral_service::get_earnings(&state, params.user_id).await?;
    Ok(Json(response))
}
