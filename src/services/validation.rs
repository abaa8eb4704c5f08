// Request validators over the static pricing and chain tables

use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::{
    feature_price_band, find_chain, CONTEST_TYPES, DEFAULT_COMMISSION_RATE, GLOBAL_MAX_CENTS,
    GLOBAL_MIN_CENTS, MAX_PLATFORM_FEE_BP, MIN_PLATFORM_FEE_BP, OPENROUTER_MODELS,
    REFERRAL_CODE_ALPHABET, REFERRAL_CODE_LENGTH,
};
use crate::services::money::{basis_points_of, from_cents, round2};

/// Outcome of a validation check. Failures carry a message fit for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(message.into()),
        }
    }

    /// Converts into a `Result`, keeping the failure message
    pub fn into_result(self) -> Result<(), String> {
        match self.error {
            Some(message) if !self.valid => Err(message),
            _ => Ok(()),
        }
    }
}

pub fn validate_global_pricing(usd_amount: Decimal) -> ValidationResult {
    let min = from_cents(GLOBAL_MIN_CENTS);
    let max = from_cents(GLOBAL_MAX_CENTS);

    if usd_amount < min {
        return ValidationResult::fail(format!("Amount must be at least ${}", min));
    }
    if usd_amount > max {
        return ValidationResult::fail(format!("Amount must not exceed ${}", max));
    }

    ValidationResult::ok()
}

pub fn validate_feature_pricing(feature_type: &str, usd_amount: Decimal) -> ValidationResult {
    let global = validate_global_pricing(usd_amount);
    if !global.valid {
        return global;
    }

    let Some(band) = feature_price_band(feature_type) else {
        return ValidationResult::fail(format!("Invalid feature type: {}", feature_type));
    };

    let min = from_cents(band.min_cents);
    let max = from_cents(band.max_cents);
    if usd_amount < min || usd_amount > max {
        return ValidationResult::fail(format!(
            "{} must be between ${} and ${}",
            feature_type, min, max
        ));
    }

    ValidationResult::ok()
}

pub fn validate_model(model: &str) -> ValidationResult {
    if !OPENROUTER_MODELS.contains(&model) {
        return ValidationResult::fail("Invalid model. Only free OpenRouter models are allowed.");
    }
    ValidationResult::ok()
}

pub fn validate_chain(chain: &str) -> ValidationResult {
    if find_chain(chain).is_none() {
        return ValidationResult::fail(format!("Unsupported chain: {}", chain));
    }
    ValidationResult::ok()
}

pub fn validate_contest_entry_fee(entry_fee_usd: Decimal) -> ValidationResult {
    validate_global_pricing(entry_fee_usd)
}

pub fn validate_contest_type(contest_type: &str) -> ValidationResult {
    if !CONTEST_TYPES.contains(&contest_type) {
        return ValidationResult::fail(format!(
            "Invalid contest type. Must be one of: {}",
            CONTEST_TYPES.join(", ")
        ));
    }
    ValidationResult::ok()
}

pub fn validate_platform_fee_bp(fee_bp: i32) -> ValidationResult {
    if !(MIN_PLATFORM_FEE_BP..=MAX_PLATFORM_FEE_BP).contains(&fee_bp) {
        return ValidationResult::fail(format!(
            "Platform fee must be between {}bp and {}bp",
            MIN_PLATFORM_FEE_BP, MAX_PLATFORM_FEE_BP
        ));
    }
    ValidationResult::ok()
}

pub fn validate_referral_code(code: &str) -> ValidationResult {
    if !(4..=20).contains(&code.chars().count()) {
        return ValidationResult::fail("Referral code must be between 4 and 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return ValidationResult::fail(
            "Referral code can only contain letters, numbers, hyphens, and underscores",
        );
    }
    ValidationResult::ok()
}

pub fn validate_fid(fid: i64) -> ValidationResult {
    if fid < 1 {
        return ValidationResult::fail("Invalid Farcaster FID");
    }
    ValidationResult::ok()
}

/// Shape check only; the hash is never looked up on-chain here
pub fn validate_tx_hash(tx_hash: &str, chain: &str) -> ValidationResult {
    if tx_hash.len() < 32 {
        return ValidationResult::fail("Invalid transaction hash");
    }
    if chain != "Solana" && !tx_hash.starts_with("0x") {
        return ValidationResult::fail("EVM transaction hash must start with 0x");
    }
    ValidationResult::ok()
}

pub fn generate_referral_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..REFERRAL_CODE_ALPHABET.len());
            REFERRAL_CODE_ALPHABET[idx] as char
        })
        .collect()
}

pub fn generate_default_referral_code() -> String {
    generate_referral_code(REFERRAL_CODE_LENGTH)
}

/// `amount × rate`, rounded to cents. The rate is a fraction, 0.10 for ten percent.
pub fn calculate_commission(amount: Decimal, rate: Decimal) -> Decimal {
    round2(amount * rate)
}

pub fn calculate_default_commission(amount: Decimal) -> Decimal {
    calculate_commission(amount, DEFAULT_COMMISSION_RATE)
}

pub fn calculate_platform_fee(pot_amount: Decimal, fee_bp: i32) -> Decimal {
    basis_points_of(pot_amount, fee_bp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_global_pricing_bounds() {
        assert!(validate_global_pricing(d("0.75")).valid);
        assert!(validate_global_pricing(d("5.00")).valid);
        assert!(validate_global_pricing(d("2.5")).valid);

        let low = validate_global_pricing(d("0.74"));
        assert!(!low.valid);
        assert_eq!(low.error.as_deref(), Some("Amount must be at least $0.75"));

        let high = validate_global_pricing(d("5.01"));
        assert_eq!(high.error.as_deref(), Some("Amount must not exceed $5.00"));
    }

    #[test]
    fn test_feature_pricing_band() {
        assert!(validate_feature_pricing("memecoin_quick", d("1.50")).valid);
        assert!(!validate_feature_pricing("memecoin_quick", d("1.51")).valid);
        assert!(validate_feature_pricing("memecoin_full", d("3.00")).valid);

        let below = validate_feature_pricing("memecoin_full", d("2.99"));
        assert_eq!(
            below.error.as_deref(),
            Some("memecoin_full must be between $3.00 and $5.00")
        );

        let unknown = validate_feature_pricing("free_lunch", d("1.00"));
        assert_eq!(unknown.error.as_deref(), Some("Invalid feature type: free_lunch"));

        // global check runs first
        let global = validate_feature_pricing("free_lunch", d("9.00"));
        assert_eq!(global.error.as_deref(), Some("Amount must not exceed $5.00"));
    }

    #[test]
    fn test_chain_and_contest_type() {
        for chain in ["Base", "Solana", "BSC", "Ethereum", "Arbitrum", "Monad", "HyperEVM", "Celo"]
        {
            assert!(validate_chain(chain).valid, "{} should be supported", chain);
        }
        assert!(!validate_chain("Polygon").valid);

        assert!(validate_contest_type("meme_thread").valid);
        assert_eq!(
            validate_contest_type("poetry").error.as_deref(),
            Some("Invalid contest type. Must be one of: memecoin, meme_thread, nft_concept")
        );
    }

    #[test]
    fn test_platform_fee_bp() {
        assert!(validate_platform_fee_bp(1000).valid);
        assert!(validate_platform_fee_bp(3000).valid);
        assert!(!validate_platform_fee_bp(999).valid);
        assert!(!validate_platform_fee_bp(3001).valid);
    }

    #[test]
    fn test_referral_code_format() {
        assert!(validate_referral_code("AB12").valid);
        assert!(validate_referral_code("degen_king-2025").valid);
        assert!(!validate_referral_code("abc").valid);
        assert!(!validate_referral_code("this-code-is-far-too-long").valid);
        assert!(!validate_referral_code("no spaces").valid);
    }

    #[test]
    fn test_generated_codes_use_safe_alphabet() {
        for _ in 0..50 {
            let code = generate_default_referral_code();
            assert_eq!(code.len(), 8);
            assert!(validate_referral_code(&code).valid);
            assert!(!code.chars().any(|c| "0O1I".contains(c)));
        }
    }

    #[test]
    fn test_tx_hash_shape() {
        let evm = format!("0x{}", "a".repeat(64));
        assert!(validate_tx_hash(&evm, "Base").valid);
        assert!(!validate_tx_hash(&"a".repeat(64), "Base").valid);
        assert!(validate_tx_hash(&"5".repeat(88), "Solana").valid);
        assert!(!validate_tx_hash("0x1234", "Ethereum").valid);
    }

    #[test]
    fn test_commission_and_platform_fee() {
        assert_eq!(calculate_commission(d("37.00"), d("0.10")), d("3.70"));
        assert_eq!(calculate_commission(d("0.75"), d("0.10")), d("0.08"));
        assert_eq!(DEFAULT_COMMISSION_RATE, d("0.10"));
        assert_eq!(calculate_default_commission(d("2.50")), d("0.25"));
        assert_eq!(calculate_platform_fee(d("100.00"), 2000), d("20.00"));
    }

    #[test]
    fn test_model_allow_list() {
        assert!(validate_model("qwen/qwen3-4b:free").valid);
        assert!(!validate_model("openai/gpt-4o").valid);
    }

    #[test]
    fn test_into_result_keeps_message() {
        assert_eq!(validate_fid(42).into_result(), Ok(()));
        assert_eq!(
            validate_fid(0).into_result(),
            Err("Invalid Farcaster FID".to_string())
        );
    }
}
