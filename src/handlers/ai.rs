// Handler for paid AI generation

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::HubResult;
use crate::handlers::AppState;
use crate::models::GenerateRequest;
use crate::services::ai_service::{self, GenerateResponse};

/// Handler for POST /api/ai/generate
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> HubResult<Json<GenerateResponse>> {
    let Json(req) = payload?;
    let response = ai_service::generate(&state, req).await?;
    Ok(Json(response))
}
