// Handlers for user endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use crate::error::HubResult;
use crate::handlers::AppState;
use crate::models::{UpsertUserRequest, UserIdQuery};
use crate::services::user_service::{self, ProfileResponse, UserResponse};

/// Handler for POST /api/users - Registers or updates a user by Farcaster id
pub async fn upsert_user(
    State(state): State<AppState>,
    payload: Result<Json<UpsertUserRequest>, JsonRejection>,
) -> HubResult<Json<UserResponse>> {
    let Json(req) = payload?;
    let response = user_service::upsert_user(&state, req).await?;
    Ok(Json(response))
}

/// Handler for GET /api/users/profile?userId=...
pub async fn get_profile(
    State(state): State<AppState>,
    query: Result<Query<UserIdQuery>, QueryRejection>,
) -> HubResult<Json<ProfileResponse>> {
    let Query(params) = query?;
    let response = user_service::get_profile(&state, params.user_id).await?;
    Ok(Json(response))
}
