mod common;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use common::{create_user, pay, setup, setup_with_config, usd};
use degenz_hub_api::config::ApiConfig;
use degenz_hub_api::db::repositories::NewAiJob;
use degenz_hub_api::error::HubError;
use degenz_hub_api::handlers::AppState;
use degenz_hub_api::models::{
    CastVoteRequest, CloseContestRequest, CreateContestRequest, EnterContestRequest,
    GenerateRequest,
};
use degenz_hub_api::services::{ai_service, contest_service::{self, ContestView}};

fn entry_request(contest_id: i32, user_id: i32, payment_id: i32) -> EnterContestRequest {
    EnterContestRequest {
        contest_id: Some(contest_id),
        user_id: Some(user_id),
        payment_id: Some(payment_id),
        content_type: Some("text".to_string()),
        content: Some("gm".to_string()),
    }
}

fn assert_payment_used(result: Result<impl std::fmt::Debug, HubError>) {
    match result {
        Err(HubError::Conflict(msg)) => assert_eq!(msg, "Payment has already been used"),
        other => panic!("expected a used-payment conflict, got {:?}", other),
    }
}

fn contest_request(creator_id: i32, fee: Decimal) -> CreateContestRequest {
    CreateContestRequest {
        creator_id: Some(creator_id),
        title: Some("Best memecoin".to_string()),
        description: Some("Pitch your ticker".to_string()),
        contest_type: Some("memecoin".to_string()),
        entry_fee_usd: Some(fee),
        platform_fee_bp: None,
        chain: Some("Base".to_string()),
        ends_at: Some(Utc::now() + Duration::days(3)),
    }
}

async fn create_contest(state: &AppState, creator_id: i32, fee: Decimal) -> ContestView {
    contest_service::create_contest(state, contest_request(creator_id, fee))
        .await
        .unwrap()
        .contest
}

/// Creates a user, pays the entry fee and enters the contest
async fn enter(state: &AppState, contest: &ContestView, fid: i64) -> i32 {
    let user = create_user(state, fid).await;
    let payment = pay(state, user.id, fid as u32, "contest_entry", contest.entry_fee_usd).await;

    contest_service::enter_contest(
        state,
        EnterContestRequest {
            contest_id: Some(contest.id),
            user_id: Some(user.id),
            payment_id: Some(payment.id),
            content_type: Some("text".to_string()),
            content: Some(format!("$DGN{}", fid)),
        },
    )
    .await
    .unwrap()
    .entry
    .id
}

async fn vote(state: &AppState, contest_id: i32, voter_id: i32, entry_id: i32) -> Result<(), HubError> {
    contest_service::cast_vote(
        state,
        CastVoteRequest {
            contest_id: Some(contest_id),
            voter_id: Some(voter_id),
            entry_id: Some(entry_id),
        },
    )
    .await
    .map(|_| ())
}

#[tokio::test]
async fn test_create_contest_validates_input() {
    let state = setup().await;
    let creator = create_user(&state, 7001).await;

    let contest = create_contest(&state, creator.id, usd(200)).await;
    assert_eq!(contest.status, "active");
    assert_eq!(contest.platform_fee_bp, 2000);
    assert_eq!(contest.total_pot_usd, Decimal::ZERO);

    let mut past = contest_request(creator.id, usd(200));
    past.ends_at = Some(Utc::now() - Duration::minutes(1));
    let err = contest_service::create_contest(&state, past).await.unwrap_err();
    assert!(matches!(err, HubError::InvalidRequest(msg) if msg == "Contest end time must be in the future"));

    let mut bad_type = contest_request(creator.id, usd(200));
    bad_type.contest_type = Some("poetry".to_string());
    assert!(matches!(
        contest_service::create_contest(&state, bad_type).await,
        Err(HubError::InvalidRequest(_))
    ));

    let mut bad_fee_bp = contest_request(creator.id, usd(200));
    bad_fee_bp.platform_fee_bp = Some(3500);
    assert!(matches!(
        contest_service::create_contest(&state, bad_fee_bp).await,
        Err(HubError::InvalidRequest(_))
    ));

    assert!(matches!(
        contest_service::create_contest(&state, contest_request(creator.id, usd(600))).await,
        Err(HubError::InvalidRequest(_))
    ));

    assert!(matches!(
        contest_service::create_contest(&state, contest_request(creator.id + 50, usd(200))).await,
        Err(HubError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_entries_grow_the_pot_once_per_user() {
    let state = setup().await;
    let creator = create_user(&state, 7101).await;
    let contest = create_contest(&state, creator.id, usd(200)).await;

    enter(&state, &contest, 7102).await;
    enter(&state, &contest, 7103).await;

    let listed = contest_service::list_contests(&state, None).await.unwrap();
    assert_eq!(listed.contests.len(), 1);
    assert_eq!(listed.contests[0].entry_count, 2);
    assert_eq!(listed.contests[0].contest.total_pot_usd, usd(400));

    // Same user again, with a fresh payment
    let repeat_user = state
        .repositories
        .user
        .find_by_fid(7102)
        .await
        .unwrap()
        .unwrap();
    let payment = pay(&state, repeat_user.id, 9102, "contest_entry", usd(200)).await;
    let duplicate = contest_service::enter_contest(
        &state,
        EnterContestRequest {
            contest_id: Some(contest.id),
            user_id: Some(repeat_user.id),
            payment_id: Some(payment.id),
            content_type: Some("text".to_string()),
            content: Some("again".to_string()),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(HubError::Conflict(msg)) if msg == "Already entered this contest"));

    let contest = state
        .repositories
        .contest
        .find_by_id(contest.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(contest.total_pot_cents, 400);
}

#[tokio::test]
async fn test_entry_payment_checks() {
    let state = setup().await;
    let creator = create_user(&state, 7201).await;
    let contest = create_contest(&state, creator.id, usd(300)).await;
    let entrant = create_user(&state, 7202).await;
    let stranger = create_user(&state, 7203).await;

    let cheap = pay(&state, entrant.id, 1, "contest_entry", usd(250)).await;
    let strangers = pay(&state, stranger.id, 2, "contest_entry", usd(300)).await;

    let request = |payment_id: i32| EnterContestRequest {
        contest_id: Some(contest.id),
        user_id: Some(entrant.id),
        payment_id: Some(payment_id),
        content_type: Some("text".to_string()),
        content: Some("gm".to_string()),
    };

    let err = contest_service::enter_contest(&state, request(strangers.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::Forbidden(_)));

    let err = contest_service::enter_contest(&state, request(cheap.id))
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::InvalidRequest(msg) if msg == "Insufficient payment amount"));

    let mut unknown_contest = request(cheap.id);
    unknown_contest.contest_id = Some(contest.id + 100);
    let err = contest_service::enter_contest(&state, unknown_contest)
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::NotFound(_)));
}

#[tokio::test]
async fn test_one_payment_funds_one_entry() {
    let state = setup().await;
    let creator = create_user(&state, 7301).await;
    let first = create_contest(&state, creator.id, usd(500)).await;
    let second = create_contest(&state, creator.id, usd(500)).await;
    let entrant = create_user(&state, 7302).await;
    let payment = pay(&state, entrant.id, 7302, "contest_entry", usd(500)).await;

    let entry = contest_service::enter_contest(&state, entry_request(first.id, entrant.id, payment.id))
        .await
        .unwrap()
        .entry;
    assert_eq!(entry.payment_id, payment.id);

    assert_payment_used(
        contest_service::enter_contest(&state, entry_request(second.id, entrant.id, payment.id)).await,
    );

    let pots: Vec<i64> = vec![
        state.repositories.contest.find_by_id(first.id).await.unwrap().unwrap().total_pot_cents,
        state.repositories.contest.find_by_id(second.id).await.unwrap().unwrap().total_pot_cents,
    ];
    assert_eq!(pots, vec![500, 0]);
}

#[tokio::test]
async fn test_payment_spent_on_generation_cannot_enter() {
    let state = setup().await;
    let creator = create_user(&state, 7401).await;
    let contest = create_contest(&state, creator.id, usd(100)).await;
    let entrant = create_user(&state, 7402).await;
    let payment = pay(&state, entrant.id, 7402, "memecoin_quick", usd(100)).await;

    state
        .repositories
        .ai_job
        .insert_job_with_pack(
            NewAiJob {
                user_id: entrant.id,
                payment_id: payment.id,
                feature_type: "memecoin_quick".to_string(),
                model_used: "qwen/qwen3-4b:free".to_string(),
                input_prompt: "frog".to_string(),
                output_ref: "$FROG".to_string(),
                price_cents: payment.usd_equiv_cents,
            },
            None,
        )
        .await
        .unwrap();

    assert_payment_used(
        contest_service::enter_contest(&state, entry_request(contest.id, entrant.id, payment.id)).await,
    );
}

#[tokio::test]
async fn test_entry_payment_cannot_fund_generation() {
    // Rejected before the provider is contacted
    let state = setup_with_config(ApiConfig {
        openrouter_api_key: "test-key".to_string(),
        ..ApiConfig::default()
    })
    .await;
    let creator = create_user(&state, 7501).await;
    let contest = create_contest(&state, creator.id, usd(100)).await;
    let entrant = create_user(&state, 7502).await;
    let payment = pay(&state, entrant.id, 7502, "contest_entry", usd(100)).await;

    contest_service::enter_contest(&state, entry_request(contest.id, entrant.id, payment.id))
        .await
        .unwrap();

    assert_payment_used(
        ai_service::generate(
            &state,
            GenerateRequest {
                user_id: Some(entrant.id),
                payment_id: Some(payment.id),
                feature_type: Some("memecoin_quick".to_string()),
                model: None,
                user_prompt: Some("a frog".to_string()),
            },
        )
        .await,
    );
}

#[tokio::test]
async fn test_one_vote_per_voter_and_entry_must_match_contest() {
    let state = setup().await;
    let creator = create_user(&state, 7301).await;
    let contest_a = create_contest(&state, creator.id, usd(100)).await;
    let contest_b = create_contest(&state, creator.id, usd(100)).await;

    let entry_a = enter(&state, &contest_a, 7302).await;
    let entry_b = enter(&state, &contest_b, 7303).await;

    vote(&state, contest_a.id, 900, entry_a).await.unwrap();
    let second = vote(&state, contest_a.id, 900, entry_a).await;
    assert!(matches!(second, Err(HubError::Conflict(msg)) if msg == "Already voted in this contest"));

    let cross = vote(&state, contest_a.id, 901, entry_b).await;
    assert!(matches!(cross, Err(HubError::NotFound(_))));

    // The same voter may vote in another contest
    vote(&state, contest_b.id, 900, entry_b).await.unwrap();

    let entries = contest_service::list_entries(&state, Some(contest_a.id))
        .await
        .unwrap();
    assert_eq!(entries.entries.len(), 1);
    assert_eq!(entries.entries[0].vote_count, 1);
    assert_eq!(entries.entries[0].user.as_ref().unwrap().fid, 7302);
}

#[tokio::test]
async fn test_close_splits_hundred_dollar_pot() {
    let state = setup().await;
    let creator = create_user(&state, 8000).await;
    let contest = create_contest(&state, creator.id, usd(500)).await;

    // 20 entries at $5.00 fill a $100 pot
    let mut entries = Vec::new();
    for i in 1..=20 {
        entries.push(enter(&state, &contest, 8000 + i).await);
    }

    let (first, second, third) = (entries[4], entries[9], entries[14]);
    for voter in 1..=5 {
        vote(&state, contest.id, voter, first).await.unwrap();
    }
    for voter in 6..=8 {
        vote(&state, contest.id, voter, second).await.unwrap();
    }
    vote(&state, contest.id, 9, third).await.unwrap();

    let not_creator = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id + 1),
        },
    )
    .await;
    assert!(matches!(not_creator, Err(HubError::Forbidden(_))));

    let closed = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id),
        },
    )
    .await
    .unwrap();

    assert_eq!(closed.contest.status, "closed");
    assert_eq!(closed.contest.total_pot_usd, usd(10000));
    assert_eq!(closed.platform_fee, usd(2000));
    assert_eq!(closed.prize_pool, usd(8000));

    let placed: Vec<(i32, u32, i64, Decimal)> = closed
        .results
        .iter()
        .map(|p| (p.entry_id, p.place, p.vote_count, p.prize))
        .collect();
    assert_eq!(
        placed,
        vec![
            (first, 1, 5, usd(4000)),
            (second, 2, 3, usd(2400)),
            (third, 3, 1, usd(1600)),
        ]
    );

    let again = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id),
        },
    )
    .await;
    assert!(matches!(again, Err(HubError::InvalidRequest(msg)) if msg == "Contest is not active"));

    // Closed contests take no more votes
    let late = vote(&state, contest.id, 77, first).await;
    assert!(matches!(late, Err(HubError::InvalidRequest(_))));

    let active = contest_service::list_contests(&state, Some("active")).await.unwrap();
    assert!(active.contests.is_empty());
    let closed_list = contest_service::list_contests(&state, Some("closed")).await.unwrap();
    assert_eq!(closed_list.contests.len(), 1);
}

#[tokio::test]
async fn test_close_with_single_entry_and_no_votes() {
    let state = setup().await;
    let creator = create_user(&state, 8101).await;
    let contest = create_contest(&state, creator.id, usd(100)).await;
    let only = enter(&state, &contest, 8102).await;

    let closed = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id),
        },
    )
    .await
    .unwrap();

    assert_eq!(closed.platform_fee, usd(20));
    assert_eq!(closed.prize_pool, usd(80));
    assert_eq!(closed.results.len(), 1);
    assert_eq!(closed.results[0].entry_id, only);
    assert_eq!(closed.results[0].vote_count, 0);
    assert_eq!(closed.results[0].prize, usd(40));
}

#[tokio::test]
async fn test_close_without_entries() {
    let state = setup().await;
    let creator = create_user(&state, 8201).await;
    let contest = create_contest(&state, creator.id, usd(100)).await;

    let closed = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id),
        },
    )
    .await
    .unwrap();

    assert!(closed.results.is_empty());
    assert_eq!(closed.platform_fee, Decimal::ZERO);
    assert_eq!(closed.prize_pool, Decimal::ZERO);
    assert_eq!(closed.contest.status, "closed");
}

#[tokio::test]
async fn test_tied_votes_go_to_earlier_entry() {
    let state = setup().await;
    let creator = create_user(&state, 8301).await;
    let contest = create_contest(&state, creator.id, usd(100)).await;

    let early = enter(&state, &contest, 8302).await;
    let late = enter(&state, &contest, 8303).await;
    vote(&state, contest.id, 1, late).await.unwrap();
    vote(&state, contest.id, 2, early).await.unwrap();

    let closed = contest_service::close_contest(
        &state,
        CloseContestRequest {
            contest_id: Some(contest.id),
            creator_id: Some(creator.id),
        },
    )
    .await
    .unwrap();

    assert_eq!(closed.results[0].entry_id, early);
    assert_eq!(closed.results[1].entry_id, late);
}
