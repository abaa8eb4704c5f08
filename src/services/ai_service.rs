// Paid AI generation: payment checks, provider call, job and meme pack storage

use chrono::Utc;
use serde::Serialize;

use crate::config::constants::{
    feature_price_band, DEFAULT_MODEL, MAX_OUTPUT_LENGTH, MAX_PROMPT_LENGTH,
};
use crate::db::repositories::{NewAiJob, NewMemePack};
use crate::db::DbError;
use crate::error::{HubError, HubResult};
use crate::handlers::AppState;
use crate::infrastructure::api::ChatMessage;
use crate::models::GenerateRequest;
use crate::services::money::from_cents;
use crate::services::payment_service::{ensure_payment_unused, payment_already_used};
use crate::services::validation::validate_model;

const EMPTY_OUTPUT: &str = "No output generated";

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub id: i32,
    pub output: String,
    pub model: String,
}

/// System prompt steering the provider for a feature
pub fn system_prompt(feature_type: &str) -> &'static str {
    match feature_type {
        "memecoin_full" => {
            "You are a memecoin launch strategist for Farcaster and Base. Produce a full launch pack: \
             ticker and token name, a lore thread of 10 to 20 casts, website copy (hero, about, \
             tokenomics), tokenomics ideas and social calls to action. Answer as JSON."
        }
        "memecoin_helpers" => {
            "You are a token launch consultant for Base and Farcaster. Produce a step-by-step launch \
             checklist, a 10 tweet tweetstorm and a 10 cast caststorm. Answer as JSON with keys \
             checklist, tweetstorm and caststorm, each an array."
        }
        "nft_idea" => {
            "You are an NFT collection designer for Farcaster and Base. Produce a collection title, \
             a short description, lore, 5 to 7 trait ideas and announcement cast copy. Answer as \
             JSON with keys title, description, lore, traits and castCopy."
        }
        "meme_pack" => {
            "You write viral meme content for Farcaster degens. Produce 5 to 10 cast ideas, caption \
             variations for X and trending memecoin angles. Answer as JSON with keys farcasterCasts, \
             twitterCaptions and angles, each an array."
        }
        "viral_scout" => {
            "You research trending crypto topics. For the given topic produce 5 degen takes, 5 cast \
             ideas and the key talking points. Answer as JSON with keys degenTakes, castIdeas and \
             talkingPoints, each an array."
        }
        "narrative_report" => {
            "You analyse crypto narratives. Produce an executive summary, 5 to 10 content angles, \
             key insights and next steps. Answer as JSON with keys summary, contentAngles, insights \
             and nextSteps."
        }
        _ => {
            "You generate viral memecoin concepts for Farcaster and Base. Produce a 3 to 5 character \
             ticker, a token name, a two or three sentence backstory, a tagline and 3 cast hooks. \
             Answer as JSON with keys ticker, name, backstory, tagline and castHooks."
        }
    }
}

/// Meme and NFT features keep their output as a browsable pack
pub fn produces_meme_pack(feature_type: &str) -> bool {
    feature_type.contains("meme") || feature_type.contains("nft")
}

/// Parsed JSON output, or the raw text wrapped as `{"raw": ...}`
pub fn pack_data(output: &str) -> serde_json::Value {
    serde_json::from_str(output).unwrap_or_else(|_| serde_json::json!({ "raw": output }))
}

/// Caps output at `MAX_OUTPUT_LENGTH` characters
pub fn truncate_output(output: String) -> String {
    match output.char_indices().nth(MAX_OUTPUT_LENGTH) {
        Some((byte_idx, _)) => output[..byte_idx].to_string(),
        None => output,
    }
}

/// Runs a paid generation job (POST /api/ai/generate)
pub async fn generate(state: &AppState, req: GenerateRequest) -> HubResult<GenerateResponse> {
    let (Some(user_id), Some(payment_id), Some(feature_type), Some(user_prompt)) = (
        req.user_id,
        req.payment_id,
        req.feature_type.filter(|f| !f.is_empty()),
        req.user_prompt.filter(|p| !p.trim().is_empty()),
    ) else {
        return Err(HubError::InvalidRequest(
            "Missing required fields".to_string(),
        ));
    };
    let model = req
        .model
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    validate_model(&model)
        .into_result()
        .map_err(HubError::InvalidRequest)?;

    if user_prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(HubError::InvalidRequest(format!(
            "Prompt must be at most {} characters",
            MAX_PROMPT_LENGTH
        )));
    }

    if !state.ai_client.is_configured() {
        return Err(HubError::InternalError(
            "OpenRouter API key not configured".to_string(),
        ));
    }

    let repos = &state.repositories;
    let payment = repos
        .payment
        .find_for_user(payment_id, user_id)
        .await?
        .ok_or_else(|| HubError::Forbidden("Payment not found or unauthorized".to_string()))?;

    let band = feature_price_band(&feature_type)
        .ok_or_else(|| HubError::InvalidRequest("Invalid feature type".to_string()))?;
    if payment.usd_equiv_cents < band.min_cents || payment.usd_equiv_cents > band.max_cents {
        return Err(HubError::InvalidRequest(format!(
            "Payment amount (${}) does not match feature pricing (${}-${})",
            from_cents(payment.usd_equiv_cents),
            from_cents(band.min_cents),
            from_cents(band.max_cents)
        )));
    }

    ensure_payment_unused(state, payment.id).await?;

    let messages = [
        ChatMessage::system(system_prompt(&feature_type)),
        ChatMessage::user(user_prompt.clone()),
    ];
    let output = match state.ai_client.complete(&model, &messages).await {
        Ok(Some(content)) => truncate_output(content),
        Ok(None) => {
            tracing::warn!("Model {} returned no content for payment {}", model, payment.id);
            EMPTY_OUTPUT.to_string()
        }
        Err(e) => {
            tracing::error!("AI generation failed for payment {}: {}", payment.id, e);
            return Err(HubError::Upstream(e.to_string()));
        }
    };

    let pack = produces_meme_pack(&feature_type).then(|| NewMemePack {
        category: feature_type.clone(),
        title: format!("{}_{}", feature_type, Utc::now().timestamp_millis()),
        data: pack_data(&output),
    });

    let (job, _) = repos
        .ai_job
        .insert_job_with_pack(
            NewAiJob {
                user_id,
                payment_id: payment.id,
                feature_type: feature_type.clone(),
                model_used: model.clone(),
                input_prompt: user_prompt,
                output_ref: output.clone(),
                price_cents: payment.usd_equiv_cents,
            },
            pack,
        )
        .await
        .map_err(|e| match e {
            DbError::Conflict(_) => payment_already_used(),
            other => other.into(),
        })?;

    tracing::info!(
        "AI job {} stored for user {} ({}, {})",
        job.id,
        user_id,
        feature_type,
        model
    );

    Ok(GenerateResponse {
        id: job.id,
        output,
        model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meme_and_nft_features_store_packs() {
        assert!(produces_meme_pack("meme_pack"));
        assert!(produces_meme_pack("memecoin_quick"));
        assert!(produces_meme_pack("nft_idea"));
        assert!(!produces_meme_pack("viral_scout"));
        assert!(!produces_meme_pack("narrative_report"));
    }

    #[test]
    fn test_pack_data_falls_back_to_raw() {
        assert_eq!(pack_data(r#"{"ticker":"DGN"}"#)["ticker"], "DGN");
        assert_eq!(pack_data("not json")["raw"], "not json");
    }

    #[test]
    fn test_truncate_output_counts_chars() {
        let short = "gm".to_string();
        assert_eq!(truncate_output(short.clone()), short);

        let long = "é".repeat(MAX_OUTPUT_LENGTH + 5);
        let truncated = truncate_output(long);
        assert_eq!(truncated.chars().count(), MAX_OUTPUT_LENGTH);
    }

    #[test]
    fn test_unknown_feature_uses_quick_prompt() {
        assert_eq!(system_prompt("lens_post"), system_prompt("memecoin_quick"));
        assert_ne!(system_prompt("meme_pack"), system_prompt("memecoin_quick"));
    }
}
