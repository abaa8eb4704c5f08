// API request models
//
// Every body field is optional at the serde level so that an absent field
// becomes "Missing required fields" instead of an extractor rejection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Accepts a token amount sent either as a JSON string or a JSON number
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "amount must be a string or number, got {}",
            other
        ))),
    }
}

/// Body of POST /api/users
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    pub fid: Option<i64>,
    pub username: Option<String>,
    pub evm_wallet: Option<String>,
    pub sol_wallet: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<i32>,
}

/// Body of POST /api/payments and POST /api/payments/base-pay
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub user_id: Option<i32>,
    pub chain: Option<String>,
    pub tx_hash: Option<String>,
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: Option<String>,
    pub usd_equiv: Option<Decimal>,
    pub feature_type: Option<String>,
    pub referral_code: Option<String>,
}

/// Body of POST /api/payments/webhook
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmByHashRequest {
    pub tx_hash: Option<String>,
    pub status: Option<String>,
}

/// Body of PUT /api/payments/webhook
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmByIdRequest {
    pub payment_id: Option<i32>,
    pub status: Option<String>,
}

/// Body of POST /api/payments/verify
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub user_id: Option<i32>,
    pub tx_hash: Option<String>,
    pub feature_type: Option<String>,
}

/// Body of POST /api/referrals
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferralRequest {
    pub user_id: Option<i32>,
}

/// Body of POST /api/contests
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateContestRequest {
    pub creator_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub contest_type: Option<String>,
    pub entry_fee_usd: Option<Decimal>,
    pub platform_fee_bp: Option<i32>,
    pub chain: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ContestListQuery {
    pub status: Option<String>,
}

/// Body of POST /api/contests/entries
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnterContestRequest {
    pub contest_id: Option<i32>,
    pub user_id: Option<i32>,
    pub payment_id: Option<i32>,
    pub content_type: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestEntriesQuery {
    pub contest_id: Option<i32>,
}

/// Body of POST /api/contests/votes
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    pub contest_id: Option<i32>,
    pub voter_id: Option<i32>,
    pub entry_id: Option<i32>,
}

/// Body of POST /api/contests/close
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CloseContestRequest {
    pub contest_id: Option<i32>,
    pub creator_id: Option<i32>,
}

/// Body of POST /api/ai/generate
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub user_id: Option<i32>,
    pub payment_id: Option<i32>,
    pub feature_type: Option<String>,
    pub model: Option<String>,
    pub user_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payment_amount_accepts_string_or_number() {
        let from_string: RecordPaymentRequest =
            serde_json::from_value(json!({ "amount": "0.0004", "usdEquiv": 1.25 })).unwrap();
        assert_eq!(from_string.amount.as_deref(), Some("0.0004"));
        assert_eq!(from_string.usd_equiv, Some(Decimal::new(125, 2)));

        let from_number: RecordPaymentRequest =
            serde_json::from_value(json!({ "amount": 12 })).unwrap();
        assert_eq!(from_number.amount.as_deref(), Some("12"));

        let missing: RecordPaymentRequest = serde_json::from_value(json!({})).unwrap();
        assert!(missing.amount.is_none());
    }

    #[test]
    fn test_contest_type_is_read_from_type_key() {
        let req: CreateContestRequest = serde_json::from_value(json!({
            "creatorId": 1,
            "type": "memecoin",
            "entryFeeUsd": 2,
            "endsAt": "2030-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(req.contest_type.as_deref(), Some("memecoin"));
        assert_eq!(req.entry_fee_usd, Some(Decimal::from(2)));
        assert!(req.ends_at.is_some());
    }
}
