// Read-only view of the payment tables for clients

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::constants::{
    ChainKind, FEATURE_PRICING, GLOBAL_MAX_CENTS, GLOBAL_MIN_CENTS, OPENROUTER_MODELS,
    SUPPORTED_CHAINS,
};
use crate::services::money::from_cents;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainPricing {
    pub name: &'static str,
    pub kind: &'static str,
    pub chain_id: Option<u64>,
    pub payment_wallet: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePricing {
    pub feature_type: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_usd: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub global_min_usd: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub global_max_usd: Decimal,
    pub chains: Vec<ChainPricing>,
    pub features: Vec<FeaturePricing>,
    pub models: Vec<&'static str>,
}

/// Chains, price bands and models a client may pay with (GET /api/pricing)
pub fn get_pricing() -> PricingResponse {
    let chains = SUPPORTED_CHAINS
        .iter()
        .map(|chain| ChainPricing {
            name: chain.name,
            kind: match chain.kind {
                ChainKind::Evm => "evm",
                ChainKind::Solana => "solana",
            },
            chain_id: chain.chain_id,
            payment_wallet: chain.payment_wallet(),
        })
        .collect();

    let features = FEATURE_PRICING
        .iter()
        .map(|(feature_type, band)| FeaturePricing {
            feature_type: *feature_type,
            min_usd: from_cents(band.min_cents),
            max_usd: from_cents(band.max_cents),
            default_usd: from_cents(band.default_cents),
        })
        .collect();

    PricingResponse {
        global_min_usd: from_cents(GLOBAL_MIN_CENTS),
        global_max_usd: from_cents(GLOBAL_MAX_CENTS),
        chains,
        features,
        models: OPENROUTER_MODELS.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_lists_every_chain_and_feature() {
        let pricing = get_pricing();
        assert_eq!(pricing.chains.len(), 8);
        assert_eq!(pricing.features.len(), FEATURE_PRICING.len());

        let solana = pricing.chains.iter().find(|c| c.name == "Solana").unwrap();
        assert_eq!(solana.kind, "solana");
        assert!(!solana.payment_wallet.starts_with("0x"));

        let json = serde_json::to_value(&pricing).unwrap();
        assert_eq!(json["globalMinUsd"], 0.75);
        assert_eq!(json["features"][0]["featureType"], "memecoin_quick");
    }
}
