//! Integration tests for the payout batch processor.
//!
//! Exercises eligibility selection, successful settlement, failure
//! isolation, and re-run idempotency against a real database with the
//! mock transfer provider.

mod common;

use std::sync::Arc;

use sqlx::PgPool;

use common::{bus, complete_onboarding, config, seed_pending_earnings, seed_scout};
use leadex_db::models::payout::{PAYOUT_COMPLETED, PAYOUT_FAILED};
use leadex_db::repositories::{PayoutRepo, ScoutRepo};
use leadex_market::payouts::{OUTCOME_COMPLETED, OUTCOME_FAILED, OUTCOME_SKIPPED};
use leadex_market::PayoutProcessor;
use leadex_payments::MockTransferProvider;

fn processor(pool: &PgPool, provider: Arc<MockTransferProvider>) -> PayoutProcessor {
    PayoutProcessor::new(pool.clone(), config(), provider, bus())
}

// ---------------------------------------------------------------------------
// Successful settlement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn eligible_scout_is_settled_in_full(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-paid").await;
    complete_onboarding(&pool, scout.id, "acct_paid").await;
    // 25.00 pending against the default 20.00 threshold.
    seed_pending_earnings(&pool, scout.id, 2500).await;

    let provider = Arc::new(MockTransferProvider::new());
    let summary = processor(&pool, Arc::clone(&provider)).run_batch().await.unwrap();

    assert_eq!(summary.candidates, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.total_disbursed_cents, 2500);

    // Earnings moved from pending to total exactly once.
    let scout = ScoutRepo::find_by_id(&pool, scout.id).await.unwrap().unwrap();
    assert_eq!(scout.pending_earnings_cents, 0);
    assert_eq!(scout.total_earnings_cents, 2500);

    // One completed payout with the provider's transfer id.
    let payouts = PayoutRepo::list_for_scout(&pool, scout.id, 10, 0).await.unwrap();
    assert_eq!(payouts.len(), 1);
    assert_eq!(payouts[0].status, PAYOUT_COMPLETED);
    assert_eq!(payouts[0].amount_cents, 2500);
    assert!(payouts[0].external_transfer_id.is_some());

    // The transfer went to the scout's payout account.
    let calls = provider.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].destination, "acct_paid");
    assert_eq!(calls[0].amount_cents, 2500);
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn below_threshold_scout_is_not_a_candidate(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-small").await;
    complete_onboarding(&pool, scout.id, "acct_small").await;
    seed_pending_earnings(&pool, scout.id, 1999).await;

    let provider = Arc::new(MockTransferProvider::new());
    let summary = processor(&pool, Arc::clone(&provider)).run_batch().await.unwrap();

    assert_eq!(summary.candidates, 0);
    assert!(provider.calls().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn onboarding_incomplete_scout_is_skipped_and_recorded(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-unonboarded").await;
    seed_pending_earnings(&pool, scout.id, 5000).await;

    let provider = Arc::new(MockTransferProvider::new());
    let summary = processor(&pool, Arc::clone(&provider)).run_batch().await.unwrap();

    assert_eq!(summary.candidates, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.outcomes[0].outcome, OUTCOME_SKIPPED);
    assert!(provider.calls().is_empty());

    // Earnings untouched; no payout row was created.
    let scout = ScoutRepo::find_by_id(&pool, scout.id).await.unwrap().unwrap();
    assert_eq!(scout.pending_earnings_cents, 5000);
    assert!(PayoutRepo::list_for_scout(&pool, scout.id, 10, 0)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn one_failed_transfer_does_not_abort_the_batch(pool: PgPool) {
    let unlucky = seed_scout(&pool, "scout-unlucky").await;
    complete_onboarding(&pool, unlucky.id, "acct_unlucky").await;
    seed_pending_earnings(&pool, unlucky.id, 3000).await;

    let lucky = seed_scout(&pool, "scout-lucky").await;
    complete_onboarding(&pool, lucky.id, "acct_lucky").await;
    seed_pending_earnings(&pool, lucky.id, 4000).await;

    let provider = Arc::new(MockTransferProvider::new());
    provider.fail_for("acct_unlucky", "destination account closed");

    let summary = processor(&pool, Arc::clone(&provider)).run_batch().await.unwrap();
    assert_eq!(summary.candidates, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.total_disbursed_cents, 4000);

    let failed_outcome = summary
        .outcomes
        .iter()
        .find(|o| o.scout_id == unlucky.id)
        .unwrap();
    assert_eq!(failed_outcome.outcome, OUTCOME_FAILED);
    assert_eq!(failed_outcome.detail.as_deref(), Some("destination account closed"));

    // The failed scout keeps every cent pending; the payout records why.
    let unlucky_row = ScoutRepo::find_by_id(&pool, unlucky.id).await.unwrap().unwrap();
    assert_eq!(unlucky_row.pending_earnings_cents, 3000);
    assert_eq!(unlucky_row.total_earnings_cents, 0);
    let payouts = PayoutRepo::list_for_scout(&pool, unlucky.id, 10, 0).await.unwrap();
    assert_eq!(payouts[0].status, PAYOUT_FAILED);
    assert_eq!(payouts[0].failure_reason.as_deref(), Some("destination account closed"));

    // The other scout settled normally.
    let lucky_row = ScoutRepo::find_by_id(&pool, lucky.id).await.unwrap().unwrap();
    assert_eq!(lucky_row.pending_earnings_cents, 0);
    assert_eq!(lucky_row.total_earnings_cents, 4000);
}

// ---------------------------------------------------------------------------
// Idempotency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn rerunning_the_batch_never_double_pays(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-rerun").await;
    complete_onboarding(&pool, scout.id, "acct_rerun").await;
    seed_pending_earnings(&pool, scout.id, 2500).await;

    let provider = Arc::new(MockTransferProvider::new());
    let processor = processor(&pool, Arc::clone(&provider));

    let first = processor.run_batch().await.unwrap();
    assert_eq!(first.succeeded, 1);

    // Second run of the same slot: the scout's pending balance is now
    // zero, so they are not a candidate and no transfer is attempted.
    let second = processor.run_batch().await.unwrap();
    assert_eq!(second.candidates, 0);
    assert_eq!(provider.calls().len(), 1);

    let scout = ScoutRepo::find_by_id(&pool, scout.id).await.unwrap().unwrap();
    assert_eq!(scout.total_earnings_cents, 2500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn failed_payout_is_retried_next_run_at_the_original_amount(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-retry").await;
    complete_onboarding(&pool, scout.id, "acct_retry").await;
    seed_pending_earnings(&pool, scout.id, 2500).await;

    let provider = Arc::new(MockTransferProvider::new());
    let processor = processor(&pool, Arc::clone(&provider));

    provider.fail_for("acct_retry", "processor unavailable");
    let first = processor.run_batch().await.unwrap();
    assert_eq!(first.failed, 1);

    // The failure left earnings pending, so the next run retries and
    // settles exactly the original amount.
    provider.succeed_for("acct_retry");
    let second = processor.run_batch().await.unwrap();
    assert_eq!(second.succeeded, 1);
    assert_eq!(second.total_disbursed_cents, 2500);

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].amount_cents, 2500);
    assert_eq!(calls[1].amount_cents, 2500);

    let scout = ScoutRepo::find_by_id(&pool, scout.id).await.unwrap().unwrap();
    assert_eq!(scout.pending_earnings_cents, 0);
    assert_eq!(scout.total_earnings_cents, 2500);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scout_with_an_open_payout_is_skipped(pool: PgPool) {
    let scout = seed_scout(&pool, "scout-stuck").await;
    complete_onboarding(&pool, scout.id, "acct_stuck").await;
    seed_pending_earnings(&pool, scout.id, 9000).await;

    // Simulate a prior run that crashed between payout creation and the
    // transfer call, leaving an open attempt behind.
    let mut tx = pool.begin().await.unwrap();
    PayoutRepo::insert_pending_in_tx(&mut tx, scout.id, 9000).await.unwrap();
    tx.commit().await.unwrap();

    let provider = Arc::new(MockTransferProvider::new());
    let summary = processor(&pool, Arc::clone(&provider)).run_batch().await.unwrap();

    assert_eq!(summary.skipped, 1);
    assert!(provider.calls().is_empty());
    let scout = ScoutRepo::find_by_id(&pool, scout.id).await.unwrap().unwrap();
    assert_eq!(scout.pending_earnings_cents, 9000);
}
