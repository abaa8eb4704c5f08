// Handler for the public pricing tables

use axum::Json;

use crate::services::pricing_service::{self, PricingResponse};

/// Handler for GET /api/pricing
pub async fn get_pricing() -> Json<PricingResponse> {
    Json(pricing_service::get_pricing())
}
