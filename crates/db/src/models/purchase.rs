//! Purchase record model.

use leadex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const PURCHASE_COMPLETED: &str = "completed";
pub const PURCHASE_REFUNDED: &str = "refunded";

/// A write-once row from the `purchases` table.
///
/// `scout_earning_cents + platform_commission_cents = purchase_price_cents`
/// exactly; the database enforces this alongside the one-active-purchase-
/// per-lead unique index.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Purchase {
    pub id: DbId,
    pub company_id: DbId,
    pub lead_id: DbId,
    pub scout_id: DbId,
    pub purchase_price_cents: i64,
    pub scout_earning_cents: i64,
    pub platform_commission_cents: i64,
    pub status: String,
    pub created_at: Timestamp,
}
