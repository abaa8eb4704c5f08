// Payment ledger: record, confirm and verify client-submitted payments

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::WhitelistConfig;
use crate::db::repositories::{CommissionRow, NewPayment, STATUS_CONFIRMED, STATUS_PENDING};
use crate::db::DbError;
use crate::entity::{payments, users};
use crate::error::{HubError, HubResult};
use crate::handlers::AppState;
use crate::models::{
    ConfirmByHashRequest, ConfirmByIdRequest, RecordPaymentRequest, VerifyPaymentRequest,
};
use crate::services::money::{from_cents, to_cents};
use crate::services::validation::{
    calculate_default_commission, validate_chain, validate_feature_pricing,
    validate_referral_code,
};

const DEFAULT_BASE_PAY_CHAIN: &str = "Base";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub id: i32,
    pub user_id: i32,
    pub chain: String,
    pub tx_hash: String,
    pub token_symbol: String,
    pub amount: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_equiv: Decimal,
    pub feature_type: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<payments::Model> for PaymentView {
    fn from(m: payments::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            chain: m.chain,
            tx_hash: m.tx_hash,
            token_symbol: m.token_symbol,
            amount: m.amount,
            usd_equiv: from_cents(m.usd_equiv_cents),
            feature_type: m.feature_type,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
    pub payment: PaymentView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasePaySummary {
    pub id: i32,
    pub status: String,
    pub tx_hash: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub usd_equiv: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BasePayResponse {
    pub success: bool,
    pub payment: BasePaySummary,
}

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    pub payment: PaymentView,
}

#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,
    pub payment: PaymentView,
    pub status: String,
}

/// Fully validated payment submission
struct PaymentSubmission {
    user_id: i32,
    chain: String,
    tx_hash: String,
    token_symbol: String,
    amount: String,
    usd_equiv: Decimal,
    feature_type: String,
    referral_code: Option<String>,
}

/// True when the user matches the configured owner identity
pub fn is_whitelisted(whitelist: &WhitelistConfig, user: &users::Model) -> bool {
    if user.fid == whitelist.fid {
        return true;
    }
    if let Some(evm) = user.evm_wallet.as_deref() {
        if evm.eq_ignore_ascii_case(&whitelist.evm_address) {
            return true;
        }
    }
    user.sol_wallet.as_deref() == Some(whitelist.sol_address.as_str())
}

/// Parses a webhook status. Only the two ledger states are accepted.
pub fn parse_payment_status(status: &str) -> HubResult<&'static str> {
    match status {
        STATUS_PENDING => Ok(STATUS_PENDING),
        STATUS_CONFIRMED => Ok(STATUS_CONFIRMED),
        other => Err(HubError::InvalidRequest(format!(
            "Invalid payment status: {}",
            other
        ))),
    }
}

fn missing_fields() -> HubError {
    HubError::InvalidRequest("Missing required fields".to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn validate_submission(
    req: RecordPaymentRequest,
    default_chain: Option<&str>,
) -> HubResult<PaymentSubmission> {
    let chain = non_empty(req.chain).or_else(|| default_chain.map(str::to_string));

    let (
        Some(user_id),
        Some(chain),
        Some(tx_hash),
        Some(token_symbol),
        Some(amount),
        Some(usd_equiv),
        Some(feature_type),
    ) = (
        req.user_id,
        chain,
        non_empty(req.tx_hash),
        non_empty(req.token_symbol),
        non_empty(req.amount),
        req.usd_equiv,
        non_empty(req.feature_type),
    )
    else {
        return Err(missing_fields());
    };

    validate_chain(&chain)
        .into_result()
        .map_err(HubError::InvalidRequest)?;
    validate_feature_pricing(&feature_type, usd_equiv)
        .into_result()
        .map_err(HubError::InvalidRequest)?;

    let referral_code = non_empty(req.referral_code);
    if let Some(code) = referral_code.as_deref() {
        validate_referral_code(code)
            .into_result()
            .map_err(HubError::InvalidRequest)?;
    }

    Ok(PaymentSubmission {
        user_id,
        chain,
        tx_hash,
        token_symbol,
        amount,
        usd_equiv,
        feature_type,
        referral_code,
    })
}

async fn store_payment(
    state: &AppState,
    submission: PaymentSubmission,
    duplicate_message: &str,
) -> HubResult<payments::Model> {
    let repos = &state.repositories;

    let user = repos
        .user
        .find_by_id(submission.user_id)
        .await?
        .ok_or_else(|| HubError::NotFound("User not found".to_string()))?;

    if repos
        .payment
        .find_by_tx_hash(&submission.tx_hash)
        .await?
        .is_some()
    {
        return Err(HubError::Conflict(duplicate_message.to_string()));
    }

    let commission = match submission.referral_code.as_deref() {
        Some(code) => match repos.referral.find_by_code(code).await? {
            Some(referral) if referral.user_id != user.id => Some(CommissionRow {
                referrer_id: referral.user_id,
                amount_cents: to_cents(calculate_default_commission(submission.usd_equiv)),
            }),
            Some(_) => {
                tracing::debug!("Ignoring self-referral for user {}", user.id);
                None
            }
            None => {
                tracing::debug!("Referral code {} not found", code);
                None
            }
        },
        None => None,
    };

    let status = if is_whitelisted(&state.config.whitelist, &user) {
        STATUS_CONFIRMED
    } else {
        STATUS_PENDING
    };

    let new_payment = NewPayment {
        user_id: user.id,
        chain: submission.chain,
        tx_hash: submission.tx_hash,
        token_symbol: submission.token_symbol,
        amount: submission.amount,
        usd_equiv_cents: to_cents(submission.usd_equiv),
        feature_type: submission.feature_type,
        status: status.to_string(),
    };

    let payment = repos
        .payment
        .insert_with_commission(new_payment, commission)
        .await
        .map_err(|e| match e {
            // lost a race against the same tx hash
            DbError::Conflict(_) => HubError::Conflict(duplicate_message.to_string()),
            other => {
                tracing::warn!("Failed to record payment: {}", other);
                HubError::from(other)
            }
        })?;

    tracing::info!(
        "Recorded payment {} for user {} ({} cents, {}, commission: {})",
        payment.id,
        payment.user_id,
        payment.usd_equiv_cents,
        payment.status,
        commission.is_some()
    );

    Ok(payment)
}

/// Records a payment submitted by the client (POST /api/payments)
pub async fn record_payment(
    state: &AppState,
    req: RecordPaymentRequest,
) -> HubResult<RecordPaymentResponse> {
    let submission = validate_submission(req, None)?;
    let payment = store_payment(state, submission, "Transaction already recorded").await?;

    Ok(RecordPaymentResponse {
        payment: payment.into(),
    })
}

/// Records a Base Pay payment; the chain defaults to Base (POST /api/payments/base-pay)
pub async fn record_base_pay(
    state: &AppState,
    req: RecordPaymentRequest,
) -> HubResult<BasePayResponse> {
    let submission = validate_submission(req, Some(DEFAULT_BASE_PAY_CHAIN))?;
    let payment = store_payment(state, submission, "Transaction already processed").await?;

    Ok(BasePayResponse {
        success: true,
        payment: BasePaySummary {
            id: payment.id,
            status: payment.status,
            tx_hash: payment.tx_hash,
            usd_equiv: from_cents(payment.usd_equiv_cents),
        },
    })
}

async fn apply_status(
    state: &AppState,
    mut payment: payments::Model,
    status: &str,
) -> HubResult<ConfirmPaymentResponse> {
    let repo = &state.repositories.payment;

    loop {
        if payment.status == status {
            return Ok(ConfirmPaymentResponse {
                success: true,
                payment: payment.into(),
            });
        }
        if payment.status == STATUS_CONFIRMED && status == STATUS_PENDING {
            return Err(HubError::InvalidRequest(
                "Confirmed payments cannot be reverted to pending".to_string(),
            ));
        }

        if repo.update_status(payment.id, &payment.status, status).await? {
            tracing::info!(
                "Payment {} moved from {} to {}",
                payment.id,
                payment.status,
                status
            );
            payment.status = status.to_string();
            return Ok(ConfirmPaymentResponse {
                success: true,
                payment: payment.into(),
            });
        }

        // Another webhook changed the row first; judge against what it stored
        payment = repo
            .find_by_id(payment.id)
            .await?
            .ok_or_else(|| HubError::NotFound("Payment not found".to_string()))?;
    }
}

pub fn payment_already_used() -> HubError {
    HubError::Conflict("Payment has already been used".to_string())
}

/// Fails when the payment already funded an AI job or a contest entry
pub async fn ensure_payment_unused(state: &AppState, payment_id: i32) -> HubResult<()> {
    let repos = &state.repositories;
    if repos.ai_job.find_by_payment(payment_id).await?.is_some()
        || repos
            .contest
            .find_entry_by_payment(payment_id)
            .await?
            .is_some()
    {
        return Err(payment_already_used());
    }
    Ok(())
}

/// Sets the status of the payment with the given tx hash (POST /api/payments/webhook)
pub async fn confirm_by_hash(
    state: &AppState,
    req: ConfirmByHashRequest,
) -> HubResult<ConfirmPaymentResponse> {
    let (Some(tx_hash), Some(status)) = (non_empty(req.tx_hash), non_empty(req.status)) else {
        return Err(missing_fields());
    };
    let status = parse_payment_status(&status)?;

    let payment = state
        .repositories
        .payment
        .find_by_tx_hash(&tx_hash)
        .await?
        .ok_or_else(|| HubError::NotFound("Payment not found".to_string()))?;

    apply_status(state, payment, status).await
}

/// Sets the status of the payment with the given id (PUT /api/payments/webhook)
pub async fn confirm_by_id(
    state: &AppState,
    req: ConfirmByIdRequest,
) -> HubResult<ConfirmPaymentResponse> {
    let (Some(payment_id), Some(status)) = (req.payment_id, non_empty(req.status)) else {
        return Err(missing_fields());
    };
    let status = parse_payment_status(&status)?;

    let payment = state
        .repositories
        .payment
        .find_by_id(payment_id)
        .await?
        .ok_or_else(|| HubError::NotFound("Payment not found".to_string()))?;

    apply_status(state, payment, status).await
}

/// Reports whether a recorded payment has been confirmed (POST /api/payments/verify)
pub async fn verify_payment(
    state: &AppState,
    req: VerifyPaymentRequest,
) -> HubResult<VerifyPaymentResponse> {
    let (Some(user_id), Some(tx_hash), Some(feature_type)) =
        (req.user_id, non_empty(req.tx_hash), non_empty(req.feature_type))
    else {
        return Err(missing_fields());
    };

    let payment = state
        .repositories
        .payment
        .find_for_verification(user_id, &tx_hash, &feature_type)
        .await?
        .ok_or_else(|| HubError::NotFound("Payment not found".to_string()))?;

    Ok(VerifyPaymentResponse {
        verified: payment.status == STATUS_CONFIRMED,
        status: payment.status.clone(),
        payment: payment.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(fid: i64, evm: Option<&str>, sol: Option<&str>) -> users::Model {
        users::Model {
            id: 1,
            fid,
            username: None,
            evm_wallet: evm.map(str::to_string),
            sol_wallet: sol.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_whitelist_matches_fid_or_wallets() {
        let whitelist = WhitelistConfig::default();

        assert!(is_whitelisted(&whitelist, &user(whitelist.fid, None, None)));
        assert!(is_whitelisted(
            &whitelist,
            &user(7, Some(&whitelist.evm_address.to_lowercase()), None)
        ));
        assert!(is_whitelisted(
            &whitelist,
            &user(7, None, Some(&whitelist.sol_address))
        ));
        // Solana addresses are case-sensitive
        assert!(!is_whitelisted(
            &whitelist,
            &user(7, None, Some(&whitelist.sol_address.to_lowercase()))
        ));
        assert!(!is_whitelisted(&whitelist, &user(7, Some("0xdead"), None)));
    }

    #[test]
    fn test_parse_payment_status() {
        assert_eq!(parse_payment_status("confirmed").unwrap(), STATUS_CONFIRMED);
        assert_eq!(parse_payment_status("pending").unwrap(), STATUS_PENDING);
        assert!(matches!(
            parse_payment_status("refunded"),
            Err(HubError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_submission_requires_every_field() {
        let req = RecordPaymentRequest {
            user_id: Some(1),
            chain: Some("Base".into()),
            tx_hash: Some(format!("0x{}", "ab".repeat(32))),
            token_symbol: Some("ETH".into()),
            amount: Some("0.0004".into()),
            usd_equiv: None,
            feature_type: Some("memecoin_quick".into()),
            referral_code: None,
        };

        let err = validate_submission(req, None).err().unwrap();
        assert!(matches!(err, HubError::InvalidRequest(msg) if msg == "Missing required fields"));
    }

    #[test]
    fn test_base_pay_defaults_chain() {
        let req = RecordPaymentRequest {
            user_id: Some(1),
            chain: None,
            tx_hash: Some(format!("0x{}", "ab".repeat(32))),
            token_symbol: Some("USDC".into()),
            amount: Some("1.00".into()),
            usd_equiv: Some(Decimal::ONE),
            feature_type: Some("memecoin_quick".into()),
            referral_code: Some("".into()),
        };

        let submission = validate_submission(req, Some(DEFAULT_BASE_PAY_CHAIN)).unwrap();
        assert_eq!(submission.chain, "Base");
        assert!(submission.referral_code.is_none());
    }

    #[test]
    fn test_submission_rejects_out_of_band_amount() {
        let req = RecordPaymentRequest {
            user_id: Some(1),
            chain: Some("Solana".into()),
            tx_hash: Some("5".repeat(88)),
            token_symbol: Some("SOL".into()),
            amount: Some("0.01".into()),
            usd_equiv: Some(Decimal::new(200, 2)),
            feature_type: Some("memecoin_quick".into()),
            referral_code: None,
        };

        let err = validate_submission(req, None).err().unwrap();
        assert!(matches!(
            err,
            HubError::InvalidRequest(msg) if msg == "memecoin_quick must be between $0.75 and $1.50"
        ));
    }
}
