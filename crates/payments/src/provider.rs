//! The transfer provider seam.

use async_trait::async_trait;
use serde::Serialize;

use leadex_core::types::DbId;

/// Opaque transfer failure, surfaced verbatim into `payouts.failure_reason`.
///
/// Timeouts, network errors, and processor rejections all collapse into
/// this type; the settlement engine treats them identically (the payout
/// fails, balances stay untouched).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransferError(pub String);

/// Correlation data attached to every transfer request.
#[derive(Debug, Clone, Serialize)]
pub struct TransferMetadata {
    pub payout_id: DbId,
    pub scout_id: DbId,
}

/// An external payment processor capable of moving money to a scout's
/// account.
///
/// Implementations must never be called while a database transaction is
/// open; the payout processor sequences its transactions around this call.
#[async_trait]
pub trait TransferProvider: Send + Sync {
    /// Initiate a transfer of `amount_cents` to `destination`.
    ///
    /// Returns the processor's transfer id on success.
    async fn create_transfer(
        &self,
        destination: &str,
        amount_cents: i64,
        metadata: &TransferMetadata,
    ) -> Result<String, TransferError>;
}
