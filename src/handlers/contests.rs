// Handlers for contest endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};

use crate::error::HubResult;
use crate::handlers::AppState;
use crate::models::{
    CastVoteRequest, CloseContestRequest, ContestEntriesQuery, ContestListQuery,
    CreateContestRequest, EnterContestRequest,
};
use crate::services::contest_service::{
    self, CloseContestResponse, ContestListResponse, ContestResponse, EntryListResponse,
    EntryResponse, VoteResponse,
};

/// Handler for POST /api/contests
pub async fn create_contest(
    State(state): State<AppState>,
    payload: Result<Json<CreateContestRequest>, JsonRejection>,
) -> HubResult<Json<ContestResponse>> {
    let Json(req) = payload?;
    let response = contest_service::create_contest(&state, req).await?;
    Ok(Json(response))
}

/// Handler for GET /api/contests?status=active
pub async fn list_contests(
    State(state): State<AppState>,
    query: Result<Query<ContestListQuery>, QueryRejection>,
) -> HubResult<Json<ContestListResponse>> {
    let Query(params) = query?;
    let response = contest_service::list_contests(&state, params.status.as_deref()).await?;
    Ok(Json(response))
}

/// Handler for POST /api/contests/entries
pub async fn enter_contest(
    State(state): State<AppState>,
    payload: Result<Json<EnterContestRequest>, JsonRejection>,
) -> HubResult<Json<EntryResponse>> {
    let Json(req) = payload?;
    let response = contest_service::enter_contest(&state, req).await?;
    Ok(Json(response))
}

/// Handler for GET /api/contests/entries?contestId=...
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ContestEntriesQuery>, QueryRejection>,
) -> HubResult<Json<EntryListResponse>> {
    let Query(params) = query?;
    let response = contest_service::list_entries(&state, params.contest_id).await?;
    Ok(Json(response))
}

/// Handler for POST /api/contests/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    payload: Result<Json<CastVoteRequest>, JsonRejection>,
) -> HubResult<Json<VoteResponse>> {
    let Json(req) = payload?;
    let response = contest_service::cast_vote(&state, req).await?;
    Ok(Json(response))
}

/// Handler for POST /api/contests/close
pub async fn close_contest(
    State(state): State<AppState>,
    payload: Result<Json<CloseContestRequest>, JsonRejection>,
) -> HubResult<Json<CloseContestResponse>> {
    let Json(req) = payload?;
    let response = contest_service::close_contest(&state, req).await?;
    Ok(Json(response))
}
