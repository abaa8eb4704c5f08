// Handlers for the payment ledger endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::HubResult;
use crate::handlers::AppState;
use crate::models::{
    ConfirmByHashRequest, ConfirmByIdRequest, RecordPaymentRequest, VerifyPaymentRequest,
};
use crate::services::payment_service::{
    self, BasePayResponse, ConfirmPaymentResponse, RecordPaymentResponse, VerifyPaymentResponse,
};

/// Handler for POST /api/payments - Records a client-submitted payment
pub async fn record_payment(
    State(state): State<AppState>,
    payload: Result<Json<RecordPaymentRequest>, JsonRejection>,
) -> HubResult<Json<RecordPaymentResponse>> {
    let Json(req) = payload?;
    let response = payment_service::record_payment(&state, req).await?;
    Ok(Json(response))
}

/// Handler for POST /api/payments/base-pay - Records a Base Pay payment
pub async fn record_base_pay(
    State(state): State<AppState>,
    payload: Result<Json<RecordPaymentRequest>, JsonRejection>,
) -> HubResult<Json<BasePayResponse>> {
    let Json(req) = payload?;
    let response = payment_service::record_base_pay(&state, req).await?;
    Ok(Json(response))
}

/// Handler for POST /api/payments/webhook - Sets a payment status by tx hash
pub async fn confirm_by_hash(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmByHashRequest>, JsonRejection>,
) -> HubResult<Json<ConfirmPaymentResponse>> {
    let Json(req) = payload?;
    let response = payment_service::confirm_by_hash(&state, req).await?;
    Ok(Json(response))
}

/// Handler for PUT /api/payments/webhook - Sets a payment status by id
pub async fn confirm_by_id(
    State(state): State<AppState>,
    payload: Result<Json<ConfirmByIdRequest>, JsonRejection>,
) -> HubResult<Json<ConfirmPaymentResponse>> {
    let Json(req) = payload?;
    let response = payment_service::confirm_by_id(&state, req).await?;
    Ok(Json(response))
}

/// Handler for POST /api/payments/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> HubResult<Json<VerifyPaymentResponse>> {
    let Json(req) = payload?;
    let response = payment_service::verify_payment(&state, req).await?;
    Ok(Json(response))
}
