//! Static pricing, chain and model tables. Read-only for the life of the process.
//!
//! USD values are expressed in cents so the tables can stay `const`.

use rust_decimal::Decimal;

/// Farcaster id of the hub owner
pub const OWNER_FID: i64 = 1378286;
pub const OWNER_EVM_WALLET: &str = "0xcc9569bF1d87B7a18BD3363413b823AaF06084d3";
pub const OWNER_SOL_WALLET: &str = "BWYezHCzL6SUbqumfqtZAfcZ7krxJ8xSqLDhSQMUx4C7";

/// Every payment must fall inside [$0.75, $5.00]
pub const GLOBAL_MIN_CENTS: i64 = 75;
pub const GLOBAL_MAX_CENTS: i64 = 500;

/// Kind of wallet a chain settles to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    Evm,
    Solana,
}

#[derive(Debug, Clone, Copy)]
pub struct ChainInfo {
    pub name: &'static str,
    pub kind: ChainKind,
    pub chain_id: Option<u64>,
}

impl ChainInfo {
    /// Wallet that receives payments on this chain
    pub fn payment_wallet(&self) -> &'static str {
        match self.kind {
            ChainKind::Evm => OWNER_EVM_WALLET,
            ChainKind::Solana => OWNER_SOL_WALLET,
        }
    }
}

pub const SUPPORTED_CHAINS: [ChainInfo; 8] = [
    ChainInfo { name: "Base", kind: ChainKind::Evm, chain_id: Some(8453) },
    ChainInfo { name: "Solana", kind: ChainKind::Solana, chain_id: None },
    ChainInfo { name: "BSC", kind: ChainKind::Evm, chain_id: Some(56) },
    ChainInfo { name: "Ethereum", kind: ChainKind::Evm, chain_id: Some(1) },
    ChainInfo { name: "Arbitrum", kind: ChainKind::Evm, chain_id: Some(42161) },
    ChainInfo { name: "Monad", kind: ChainKind::Evm, chain_id: None },
    ChainInfo { name: "HyperEVM", kind: ChainKind::Evm, chain_id: None },
    ChainInfo { name: "Celo", kind: ChainKind::Evm, chain_id: Some(42220) },
];

pub fn find_chain(name: &str) -> Option<&'static ChainInfo> {
    SUPPORTED_CHAINS.iter().find(|c| c.name == name)
}

/// Allowed USD band for a paid feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBand {
    pub min_cents: i64,
    pub max_cents: i64,
    pub default_cents: i64,
}

const fn band(min_cents: i64, max_cents: i64, default_cents: i64) -> PriceBand {
    PriceBand { min_cents, max_cents, default_cents }
}

/// Feature type used by payments that fund a contest entry
pub const CONTEST_ENTRY_FEATURE: &str = "contest_entry";

pub const FEATURE_PRICING: [(&str, PriceBand); 16] = [
    ("memecoin_quick", band(75, 150, 100)),
    ("memecoin_full", band(300, 500, 400)),
    ("memecoin_helpers", band(100, 300, 200)),
    ("nft_idea", band(75, 150, 100)),
    ("meme_pack", band(100, 300, 200)),
    ("viral_scout", band(75, 200, 150)),
    ("narrative_report", band(300, 500, 400)),
    ("nft_mint", band(200, 300, 250)),
    ("memecoin_launch", band(300, 500, 400)),
    ("market_analysis", band(100, 200, 150)),
    ("builder_reputation", band(75, 150, 100)),
    ("token_price", band(75, 100, 75)),
    ("contract_interaction", band(200, 300, 250)),
    ("ai_research", band(100, 200, 150)),
    ("lens_post", band(150, 250, 200)),
    (CONTEST_ENTRY_FEATURE, band(75, 500, 100)),
];

pub fn feature_price_band(feature_type: &str) -> Option<PriceBand> {
    FEATURE_PRICING
        .iter()
        .find(|(name, _)| *name == feature_type)
        .map(|(_, band)| *band)
}

/// Referral commission as a fraction of the payment (0.10)
pub const DEFAULT_COMMISSION_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
pub const REFERRAL_CODE_LENGTH: usize = 8;
pub const REFERRAL_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const REFERRAL_CODE_MAX_ATTEMPTS: usize = 10;

pub const DEFAULT_PLATFORM_FEE_BP: i32 = 2000;
pub const MIN_PLATFORM_FEE_BP: i32 = 1000;
pub const MAX_PLATFORM_FEE_BP: i32 = 3000;
pub const CONTEST_TYPES: [&str; 3] = ["memecoin", "meme_thread", "nft_concept"];

/// Prize share per place, in percent of the prize pool
pub const PRIZE_SHARES_PERCENT: [u32; 3] = [50, 30, 20];

pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.3-8b-instruct:free";
pub const MAX_PROMPT_LENGTH: usize = 2000;
pub const MAX_OUTPUT_LENGTH: usize = 10000;

pub const OPENROUTER_MODELS: [&str; 18] = [
    "meituan/longcat-flash-chat:free",
    "openai/gpt-oss-20b:free",
    "z-ai/glm-4.5-air:free",
    "moonshotai/kimi-k2:free",
    "google/gemma-3n-e2b-it:free",
    "tencent/hunyuan-a13b-instruct:free",
    "tngtech/deepseek-r1t2-chimera:free",
    "mistralai/mistral-small-3.2-24b-instruct:free",
    "moonshotai/kimi-dev-72b:free",
    "deepseek/deepseek-r1-0528:free",
    "mistralai/devstral-small-2505:free",
    "google/gemma-3n-e4b-it:free",
    DEFAULT_MODEL,
    "qwen/qwen3-4b:free",
    "qwen/qwen3-30b-a3b:free",
    "deepseek/deepseek-chat-v3.1:free",
    "minimax/minimax-m2:free",
    "nvidia/nemotron-nano-12b-v2-vl:free",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_band_sits_inside_global_bounds() {
        for (name, band) in FEATURE_PRICING.iter() {
            assert!(band.min_cents >= GLOBAL_MIN_CENTS, "{} min below global", name);
            assert!(band.max_cents <= GLOBAL_MAX_CENTS, "{} max above global", name);
            assert!(
                (band.min_cents..=band.max_cents).contains(&band.default_cents),
                "{} default outside band",
                name
            );
        }
    }

    #[test]
    fn test_solana_pays_to_solana_wallet() {
        let solana = find_chain("Solana").unwrap();
        assert_eq!(solana.payment_wallet(), OWNER_SOL_WALLET);
        assert_eq!(find_chain("Base").unwrap().chain_id, Some(8453));
        assert!(find_chain("base").is_none());
    }
}
