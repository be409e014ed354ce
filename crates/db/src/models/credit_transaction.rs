//! Credit ledger entry model.

use leadex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Ledger entry kinds.
pub const KIND_ALLOCATION: &str = "allocation";
pub const KIND_PURCHASE: &str = "purchase";
pub const KIND_USAGE: &str = "usage";
pub const KIND_REFUND: &str = "refund";

/// An immutable row from the `credit_transactions` table.
///
/// Replaying a company's rows in id order and summing `amount` yields the
/// company's current `credits_remaining`; each row's `balance_after` equals
/// the running sum at that point.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditTransaction {
    pub id: DbId,
    pub company_id: DbId,
    pub kind: String,
    /// Signed credit delta: positive for allocation/refund, negative for
    /// purchase/usage.
    pub amount: i64,
    pub balance_after: i64,
    pub description: String,
    pub related_purchase_id: Option<DbId>,
    pub created_at: Timestamp,
}
