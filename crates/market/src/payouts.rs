//! The payout batch processor.
//!
//! Scans scouts whose pending earnings meet the configured threshold and
//! drives each through an external transfer, one scout at a time, each as
//! its own atomic step. A failure for one scout never aborts the rest of
//! the batch, and no database transaction is ever open across the
//! transfer call.
//!
//! Idempotency is by payout record: the settlement amount is snapshotted
//! into a `pending` payout row before the transfer, and a scout with an
//! open payout is skipped by later runs. Re-running the same scheduled
//! slot therefore never double-pays.

use std::sync::Arc;

use serde::Serialize;

use leadex_core::config::MarketplaceConfig;
use leadex_core::money::format_cents;
use leadex_core::types::DbId;
use leadex_db::error::DbError;
use leadex_db::models::scout::Scout;
use leadex_db::repositories::{PayoutRepo, ScoutRepo};
use leadex_db::DbPool;
use leadex_events::{EventBus, MarketEvent};
use leadex_payments::{TransferMetadata, TransferProvider};

/// Outcome kinds for one scout in a batch.
pub const OUTCOME_COMPLETED: &str = "completed";
pub const OUTCOME_FAILED: &str = "failed";
pub const OUTCOME_SKIPPED: &str = "skipped";

/// Per-scout result of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutOutcome {
    pub scout_id: DbId,
    pub payout_id: Option<DbId>,
    pub amount_cents: i64,
    pub outcome: &'static str,
    /// Failure reason or skip cause; absent for completed settlements.
    pub detail: Option<String>,
}

/// Aggregate result of one batch run, for operational reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutBatchSummary {
    /// Scouts whose pending earnings met the threshold.
    pub candidates: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_disbursed_cents: i64,
    pub outcomes: Vec<ScoutOutcome>,
}

/// Drives scheduled (or manually triggered) settlement batches.
///
/// Schedule-agnostic: `run_batch` is an ordinary async method, invoked by
/// the background scheduler in production and called directly in tests.
pub struct PayoutProcessor {
    pool: DbPool,
    config: MarketplaceConfig,
    provider: Arc<dyn TransferProvider>,
    bus: Arc<EventBus>,
}

impl PayoutProcessor {
    pub fn new(
        pool: DbPool,
        config: MarketplaceConfig,
        provider: Arc<dyn TransferProvider>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            config,
            provider,
            bus,
        }
    }

    /// Run one settlement batch over all currently eligible scouts.
    ///
    /// Only the candidate scan can fail as a whole; every per-scout error
    /// is absorbed into that scout's outcome.
    pub async fn run_batch(&self) -> Result<PayoutBatchSummary, sqlx::Error> {
        let candidates =
            ScoutRepo::list_payout_candidates(&self.pool, self.config.payout_threshold_cents)
                .await?;

        tracing::info!(
            candidates = candidates.len(),
            threshold = %format_cents(self.config.payout_threshold_cents),
            "Payout batch started"
        );

        let mut outcomes = Vec::with_capacity(candidates.len());
        for scout in &candidates {
            let outcome = match self.settle_scout(scout).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(scout_id = scout.id, error = %e, "Scout settlement errored");
                    ScoutOutcome {
                        scout_id: scout.id,
                        payout_id: None,
                        amount_cents: 0,
                        outcome: OUTCOME_FAILED,
                        detail: Some(e.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let summary = PayoutBatchSummary {
            candidates: candidates.len(),
            succeeded: count(&outcomes, OUTCOME_COMPLETED),
            failed: count(&outcomes, OUTCOME_FAILED),
            skipped: count(&outcomes, OUTCOME_SKIPPED),
            total_disbursed_cents: outcomes
                .iter()
                .filter(|o| o.outcome == OUTCOME_COMPLETED)
                .map(|o| o.amount_cents)
                .sum(),
            outcomes,
        };

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            disbursed = %format_cents(summary.total_disbursed_cents),
            "Payout batch finished"
        );

        Ok(summary)
    }

    /// Settle one scout: create the payout snapshot, call the transfer
    /// provider, then reconcile the ledger per the outcome.
    async fn settle_scout(&self, scout: &Scout) -> Result<ScoutOutcome, DbError> {
        if !scout.onboarding_complete {
            return Ok(skip(scout.id, "onboarding incomplete"));
        }
        let Some(destination) = scout.payout_account.clone() else {
            return Ok(skip(scout.id, "no payout account on file"));
        };
        if PayoutRepo::has_open_for_scout(&self.pool, scout.id).await? {
            return Ok(skip(scout.id, "an open settlement attempt already exists"));
        }

        // Snapshot the settlement amount under the scout lock. The scout
        // is re-read because sales may have landed since the candidate
        // scan.
        let mut tx = self.pool.begin().await?;
        let Some(locked) = ScoutRepo::find_by_id_for_update(&mut tx, scout.id).await? else {
            return Ok(skip(scout.id, "scout no longer exists"));
        };
        if locked.pending_earnings_cents < self.config.payout_threshold_cents {
            return Ok(skip(scout.id, "pending earnings fell below the threshold"));
        }
        let amount = locked.pending_earnings_cents;
        let payout = PayoutRepo::insert_pending_in_tx(&mut tx, scout.id, amount).await?;
        tx.commit().await?;

        PayoutRepo::mark_processing(&self.pool, payout.id).await?;

        // No locks are held across the external call.
        let metadata = TransferMetadata {
            payout_id: payout.id,
            scout_id: scout.id,
        };
        match self
            .provider
            .create_transfer(&destination, amount, &metadata)
            .await
        {
            Ok(transfer_id) => {
                let mut tx = self.pool.begin().await?;
                let settled = ScoutRepo::settle_earnings_in_tx(&mut tx, scout.id, amount).await?;
                if !settled {
                    // Pending earnings only grow between snapshot and
                    // settlement, so this indicates external interference;
                    // surface it rather than force a negative balance.
                    tx.rollback().await?;
                    let reason = "pending earnings no longer cover the settlement amount";
                    PayoutRepo::mark_failed(&self.pool, payout.id, reason).await?;
                    return Ok(ScoutOutcome {
                        scout_id: scout.id,
                        payout_id: Some(payout.id),
                        amount_cents: amount,
                        outcome: OUTCOME_FAILED,
                        detail: Some(reason.into()),
                    });
                }
                PayoutRepo::mark_completed_in_tx(&mut tx, payout.id, &transfer_id).await?;
                tx.commit().await?;

                tracing::info!(
                    scout_id = scout.id,
                    payout_id = payout.id,
                    transfer_id = %transfer_id,
                    amount = %format_cents(amount),
                    "Payout completed"
                );
                self.bus.publish(MarketEvent::PayoutCompleted {
                    payout_id: payout.id,
                    scout_id: scout.id,
                    amount_cents: amount,
                });

                Ok(ScoutOutcome {
                    scout_id: scout.id,
                    payout_id: Some(payout.id),
                    amount_cents: amount,
                    outcome: OUTCOME_COMPLETED,
                    detail: None,
                })
            }
            Err(e) => {
                // Transfer failed or timed out: record the reason, leave
                // earnings untouched so the scout is eligible next run.
                PayoutRepo::mark_failed(&self.pool, payout.id, &e.0).await?;

                tracing::warn!(
                    scout_id = scout.id,
                    payout_id = payout.id,
                    reason = %e.0,
                    "Payout failed"
                );
                self.bus.publish(MarketEvent::PayoutFailed {
                    payout_id: payout.id,
                    scout_id: scout.id,
                    amount_cents: amount,
                    reason: e.0.clone(),
                });

                Ok(ScoutOutcome {
                    scout_id: scout.id,
                    payout_id: Some(payout.id),
                    amount_cents: amount,
                    outcome: OUTCOME_FAILED,
                    detail: Some(e.0),
                })
            }
        }
    }
}

fn skip(scout_id: DbId, reason: &str) -> ScoutOutcome {
    tracing::debug!(scout_id, reason, "Scout skipped by payout batch");
    ScoutOutcome {
        scout_id,
        payout_id: None,
        amount_cents: 0,
        outcome: OUTCOME_SKIPPED,
        detail: Some(reason.to_string()),
    }
}

fn count(outcomes: &[ScoutOutcome], kind: &str) -> usize {
    outcomes.iter().filter(|o| o.outcome == kind).count()
}
