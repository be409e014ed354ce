//! The payout schedule loop.
//!
//! Ticks at the configured interval (weekly by default) and invokes the
//! schedule-agnostic [`PayoutProcessor`]. The processor itself owns all
//! settlement semantics; this loop only supplies the timer and graceful
//! shutdown. Because each scout's settlement is its own atomic step and
//! the processor is idempotent per earnings snapshot, cancelling a run
//! mid-batch leaves the ledger consistent.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use leadex_market::PayoutProcessor;

/// Run the payout schedule loop until `cancel` is triggered.
///
/// The first tick of `tokio::time::interval` fires immediately, which
/// doubles as catch-up for a slot missed across a restart: any scouts
/// still eligible are settled on boot, and the open-payout guard keeps a
/// re-run from double-paying.
pub async fn run(processor: PayoutProcessor, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Payout schedule started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Payout schedule stopping");
                break;
            }
            _ = interval.tick() => {
                match processor.run_batch().await {
                    Ok(summary) => {
                        if summary.candidates > 0 {
                            tracing::info!(
                                succeeded = summary.succeeded,
                                failed = summary.failed,
                                skipped = summary.skipped,
                                disbursed_cents = summary.total_disbursed_cents,
                                "Scheduled payout batch finished"
                            );
                        } else {
                            tracing::debug!("Scheduled payout batch found no eligible scouts");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled payout batch failed");
                    }
                }
            }
        }
    }
}
