//! Payout (settlement attempt) model.

use leadex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const PAYOUT_PENDING: &str = "pending";
pub const PAYOUT_PROCESSING: &str = "processing";
pub const PAYOUT_COMPLETED: &str = "completed";
pub const PAYOUT_FAILED: &str = "failed";

/// A row from the `payouts` table: one settlement attempt for one scout.
///
/// `amount_cents` is snapshotted from the scout's pending earnings when the
/// attempt is created; a completed payout moves exactly that amount from
/// pending to total earnings, regardless of sales that landed in between.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payout {
    pub id: DbId,
    pub scout_id: DbId,
    pub amount_cents: i64,
    pub status: String,
    pub external_transfer_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
