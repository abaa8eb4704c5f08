mod common;

use common::{create_user, pay, payment_request, setup, usd};
use degenz_hub_api::error::HubError;
use degenz_hub_api::services::validation::validate_referral_code;
use degenz_hub_api::services::{payment_service, referral_service};

#[tokio::test]
async fn test_code_is_created_once_per_user() {
    let state = setup().await;
    let user = create_user(&state, 6001).await;

    let first = referral_service::get_or_create_code(&state, Some(user.id))
        .await
        .unwrap();
    let second = referral_service::get_or_create_code(&state, Some(user.id))
        .await
        .unwrap();

    assert_eq!(first.code, second.code);
    assert_eq!(first.id, second.id);
    assert_eq!(first.code.len(), 8);
    assert!(validate_referral_code(&first.code).valid);
}

#[tokio::test]
async fn test_code_requires_known_user() {
    let state = setup().await;

    let missing_id = referral_service::get_or_create_code(&state, None).await;
    assert!(matches!(missing_id, Err(HubError::InvalidRequest(_))));

    let unknown = referral_service::get_or_create_code(&state, Some(4242)).await;
    assert!(matches!(unknown, Err(HubError::NotFound(_))));
}

#[tokio::test]
async fn test_earnings_split_paid_and_pending() {
    let state = setup().await;
    let referrer = create_user(&state, 6101).await;
    let code = referral_service::get_or_create_code(&state, Some(referrer.id))
        .await
        .unwrap()
        .code;

    for (seed, cents) in [(1u32, 100i64), (2, 150), (3, 75)] {
        let payer = create_user(&state, 6200 + seed as i64).await;
        let mut req = payment_request(payer.id, seed, "builder_reputation", usd(cents));
        req.referral_code = Some(code.clone());
        payment_service::record_payment(&state, req).await.unwrap();
    }

    let earnings = referral_service::get_earnings(&state, Some(referrer.id))
        .await
        .unwrap();
    // 0.10 + 0.15 + 0.08 (0.075 rounds half away from zero)
    assert_eq!(earnings.total_earned, usd(33));
    assert_eq!(earnings.total_paid_out, usd(0));
    assert_eq!(earnings.earnings.len(), 3);

    let oldest = earnings.earnings.last().unwrap().id;
    let repo = &state.repositories.referral;
    assert!(repo.mark_paid_out(oldest).await.unwrap());
    assert!(!repo.mark_paid_out(oldest).await.unwrap());

    let earnings = referral_service::get_earnings(&state, Some(referrer.id))
        .await
        .unwrap();
    assert_eq!(earnings.total_paid_out, usd(10));
    assert_eq!(earnings.pending, usd(23));
}

#[tokio::test]
async fn test_user_without_referrals_has_zero_earnings() {
    let state = setup().await;
    let user = create_user(&state, 6301).await;
    pay(&state, user.id, 1, "token_price", usd(75)).await;

    let earnings = referral_service::get_earnings(&state, Some(user.id))
        .await
        .unwrap();
    assert!(earnings.earnings.is_empty());
    assert_eq!(earnings.total_earned, usd(0));
    assert_eq!(earnings.pending, usd(0));
}
