// Contest lifecycle: create, enter, vote, close

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::config::constants::DEFAULT_PLATFORM_FEE_BP;
use crate::db::repositories::{NewContest, CONTEST_ACTIVE};
use crate::db::DbError;
use crate::entity::{contest_entries, contests, votes};
use crate::error::{HubError, HubResult};
use crate::handlers::AppState;
use crate::models::{
    CastVoteRequest, CloseContestRequest, CreateContestRequest, EnterContestRequest,
};
use crate::services::money::{from_cents, to_cents};
use crate::services::payment_service::{ensure_payment_unused, payment_already_used};
use crate::services::payout::{compute_payout, Placement, TalliedEntry};
use crate::services::validation::{
    validate_chain, validate_contest_entry_fee, validate_contest_type, validate_platform_fee_bp,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestView {
    pub id: i32,
    pub creator_id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub contest_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub entry_fee_usd: Decimal,
    pub platform_fee_bp: i32,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pot_usd: Decimal,
    pub chain: String,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl From<contests::Model> for ContestView {
    fn from(m: contests::Model) -> Self {
        Self {
            id: m.id,
            creator_id: m.creator_id,
            title: m.title,
            description: m.description,
            contest_type: m.contest_type,
            entry_fee_usd: from_cents(m.entry_fee_cents),
            platform_fee_bp: m.platform_fee_bp,
            status: m.status,
            total_pot_usd: from_cents(m.total_pot_cents),
            chain: m.chain,
            created_at: m.created_at,
            ends_at: m.ends_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestListItem {
    #[serde(flatten)]
    pub contest: ContestView,
    pub entry_count: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryView {
    pub id: i32,
    pub contest_id: i32,
    pub user_id: i32,
    pub payment_id: i32,
    pub content_type: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<contest_entries::Model> for EntryView {
    fn from(m: contest_entries::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            user_id: m.user_id,
            payment_id: m.payment_id,
            content_type: m.content_type,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

/// Public identity of an entry's author
#[derive(Debug, Clone, Serialize)]
pub struct EntryAuthor {
    pub fid: i64,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryWithVotes {
    #[serde(flatten)]
    pub entry: EntryView,
    pub vote_count: i64,
    pub user: Option<EntryAuthor>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteView {
    pub id: i32,
    pub contest_id: i32,
    pub voter_id: i32,
    pub entry_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<votes::Model> for VoteView {
    fn from(m: votes::Model) -> Self {
        Self {
            id: m.id,
            contest_id: m.contest_id,
            voter_id: m.voter_id,
            entry_id: m.entry_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContestResponse {
    pub contest: ContestView,
}

#[derive(Debug, Serialize)]
pub struct ContestListResponse {
    pub contests: Vec<ContestListItem>,
}

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub entry: EntryView,
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryWithVotes>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub vote: VoteView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseContestResponse {
    pub contest: ContestView,
    pub results: Vec<Placement>,
    #[serde(with = "rust_decimal::serde::float")]
    pub platform_fee: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub prize_pool: Decimal,
}

fn missing_fields() -> HubError {
    HubError::InvalidRequest("Missing required fields".to_string())
}

fn not_active() -> HubError {
    HubError::InvalidRequest("Contest is not active".to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn load_contest(state: &AppState, contest_id: i32) -> HubResult<contests::Model> {
    state
        .repositories
        .contest
        .find_by_id(contest_id)
        .await?
        .ok_or_else(|| HubError::NotFound("Contest not found".to_string()))
}

/// Creates an active contest with an empty pot (POST /api/contests)
pub async fn create_contest(
    state: &AppState,
    req: CreateContestRequest,
) -> HubResult<ContestResponse> {
    let (Some(creator_id), Some(title), Some(contest_type), Some(entry_fee), Some(chain), Some(ends_at)) = (
        req.creator_id,
        non_empty(req.title),
        non_empty(req.contest_type),
        req.entry_fee_usd,
        non_empty(req.chain),
        req.ends_at,
    ) else {
        return Err(missing_fields());
    };
    let platform_fee_bp = req.platform_fee_bp.unwrap_or(DEFAULT_PLATFORM_FEE_BP);

    validate_contest_type(&contest_type)
        .into_result()
        .map_err(HubError::InvalidRequest)?;
    validate_contest_entry_fee(entry_fee)
        .into_result()
        .map_err(HubError::InvalidRequest)?;
    validate_platform_fee_bp(platform_fee_bp)
        .into_result()
        .map_err(HubError::InvalidRequest)?;
    validate_chain(&chain)
        .into_result()
        .map_err(HubError::InvalidRequest)?;

    if ends_at <= Utc::now() {
        return Err(HubError::InvalidRequest(
            "Contest end time must be in the future".to_string(),
        ));
    }

    if state.repositories.user.find_by_id(creator_id).await?.is_none() {
        return Err(HubError::NotFound("User not found".to_string()));
    }

    let contest = state
        .repositories
        .contest
        .insert(NewContest {
            creator_id,
            title,
            description: req.description.unwrap_or_default(),
            contest_type,
            entry_fee_cents: to_cents(entry_fee),
            platform_fee_bp,
            chain,
            ends_at,
        })
        .await?;

    tracing::info!("Contest {} created by user {}", contest.id, creator_id);

    Ok(ContestResponse {
        contest: contest.into(),
    })
}

/// Lists contests in a status, newest first (GET /api/contests)
pub async fn list_contests(
    state: &AppState,
    status: Option<&str>,
) -> HubResult<ContestListResponse> {
    let status = status.filter(|s| !s.is_empty()).unwrap_or(CONTEST_ACTIVE);
    let repo = &state.repositories.contest;

    let contests = repo.list_by_status(status).await?;
    let ids: Vec<i32> = contests.iter().map(|c| c.id).collect();
    let counts = repo.entry_counts(&ids).await?;

    let contests = contests
        .into_iter()
        .map(|c| ContestListItem {
            entry_count: counts.get(&c.id).copied().unwrap_or(0),
            contest: c.into(),
        })
        .collect();

    Ok(ContestListResponse { contests })
}

/// Enters a paid submission and adds the entry fee to the pot (POST /api/contests/entries)
pub async fn enter_contest(
    state: &AppState,
    req: EnterContestRequest,
) -> HubResult<EntryResponse> {
    let (Some(contest_id), Some(user_id), Some(payment_id), Some(content_type), Some(content)) = (
        req.contest_id,
        req.user_id,
        req.payment_id,
        non_empty(req.content_type),
        non_empty(req.content),
    ) else {
        return Err(missing_fields());
    };
    let repos = &state.repositories;

    let contest = load_contest(state, contest_id).await?;
    if contest.status != CONTEST_ACTIVE {
        return Err(not_active());
    }
    if contest.ends_at < Utc::now() {
        return Err(HubError::InvalidRequest("Contest has ended".to_string()));
    }

    let payment = repos
        .payment
        .find_for_user(payment_id, user_id)
        .await?
        .ok_or_else(|| HubError::Forbidden("Payment not found or unauthorized".to_string()))?;

    if payment.usd_equiv_cents < contest.entry_fee_cents {
        return Err(HubError::InvalidRequest(
            "Insufficient payment amount".to_string(),
        ));
    }

    let already_entered = || HubError::Conflict("Already entered this contest".to_string());
    if repos.contest.has_entry(contest_id, user_id).await? {
        return Err(already_entered());
    }
    ensure_payment_unused(state, payment.id).await?;

    let inserted = repos
        .contest
        .insert_entry_and_fund_pot(
            contest_id,
            user_id,
            payment.id,
            content_type,
            content,
            contest.entry_fee_cents,
        )
        .await;

    let entry = match inserted {
        Ok(entry) => entry.ok_or_else(not_active)?,
        Err(DbError::Conflict(_)) => {
            // Lost a race on one of the two unique rules
            return Err(if repos.contest.has_entry(contest_id, user_id).await? {
                already_entered()
            } else {
                payment_already_used()
            });
        }
        Err(other) => return Err(other.into()),
    };

    tracing::info!(
        "User {} entered contest {} (pot +{} cents)",
        user_id,
        contest_id,
        contest.entry_fee_cents
    );

    Ok(EntryResponse {
        entry: entry.into(),
    })
}

/// Records one vote per voter per contest (POST /api/contests/votes)
pub async fn cast_vote(state: &AppState, req: CastVoteRequest) -> HubResult<VoteResponse> {
    let (Some(contest_id), Some(voter_id), Some(entry_id)) =
        (req.contest_id, req.voter_id, req.entry_id)
    else {
        return Err(missing_fields());
    };
    let repo = &state.repositories.contest;

    let contest = load_contest(state, contest_id).await?;
    if contest.status != CONTEST_ACTIVE {
        return Err(not_active());
    }

    match repo.find_entry(entry_id).await? {
        Some(entry) if entry.contest_id == contest_id => {}
        _ => return Err(HubError::NotFound("Entry not found".to_string())),
    }

    let already_voted = || HubError::Conflict("Already voted in this contest".to_string());
    if repo.has_voted(contest_id, voter_id).await? {
        return Err(already_voted());
    }

    let vote = repo
        .insert_vote(contest_id, voter_id, entry_id)
        .await
        .map_err(|e| match e {
            DbError::Conflict(_) => already_voted(),
            other => other.into(),
        })?;

    tracing::debug!("Voter {} voted for entry {}", voter_id, entry_id);

    Ok(VoteResponse { vote: vote.into() })
}

/// Entries of a contest with their vote counts, newest first (GET /api/contests/entries)
pub async fn list_entries(
    state: &AppState,
    contest_id: Option<i32>,
) -> HubResult<EntryListResponse> {
    let contest_id =
        contest_id.ok_or_else(|| HubError::InvalidRequest("Contest ID required".to_string()))?;
    let repos = &state.repositories;

    let entries = repos.contest.entries_for_contest(contest_id).await?;
    let votes = repos.contest.vote_counts(contest_id).await?;

    let mut user_ids: Vec<i32> = entries.iter().map(|e| e.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let authors: HashMap<i32, EntryAuthor> = repos
        .user
        .find_many(&user_ids)
        .await?
        .into_iter()
        .map(|u| {
            (
                u.id,
                EntryAuthor {
                    fid: u.fid,
                    username: u.username,
                },
            )
        })
        .collect();

    let entries = entries
        .into_iter()
        .map(|e| EntryWithVotes {
            vote_count: votes.get(&e.id).copied().unwrap_or(0),
            user: authors.get(&e.user_id).cloned(),
            entry: e.into(),
        })
        .collect();

    Ok(EntryListResponse { entries })
}

/// Closes the contest and computes the 50/30/20 payout (POST /api/contests/close)
pub async fn close_contest(
    state: &AppState,
    req: CloseContestRequest,
) -> HubResult<CloseContestResponse> {
    let (Some(contest_id), Some(creator_id)) = (req.contest_id, req.creator_id) else {
        return Err(missing_fields());
    };

    let contest = load_contest(state, contest_id).await?;
    if contest.creator_id != creator_id {
        return Err(HubError::Forbidden(
            "Only contest creator can close the contest".to_string(),
        ));
    }
    if contest.status != CONTEST_ACTIVE {
        return Err(not_active());
    }

    let closed = state
        .repositories
        .contest
        .close_with_tally(contest_id)
        .await?
        .ok_or_else(not_active)?;

    let tallied: Vec<TalliedEntry> = closed
        .entries
        .iter()
        .map(|e| TalliedEntry {
            entry_id: e.id,
            user_id: e.user_id,
            vote_count: closed.vote_counts.get(&e.id).copied().unwrap_or(0),
            created_at: e.created_at,
        })
        .collect();

    let payout = compute_payout(
        from_cents(closed.contest.total_pot_cents),
        closed.contest.platform_fee_bp,
        tallied,
    );

    tracing::info!(
        "Contest {} closed: pot {} cents, {} entries, {} placed",
        contest_id,
        closed.contest.total_pot_cents,
        closed.entries.len(),
        payout.results.len()
    );

    Ok(CloseContestResponse {
        contest: closed.contest.into(),
        results: payout.results,
        platform_fee: payout.platform_fee,
        prize_pool: payout.prize_pool,
    })
}
