//! Scout entity models and DTOs.

use leadex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scout {
    pub id: DbId,
    /// Stable subject id issued by the external identity provider.
    pub external_user_id: String,
    pub name: String,
    pub email: String,
    /// Earnings accrued from sales, awaiting settlement.
    pub pending_earnings_cents: i64,
    /// Lifetime settled earnings. Never decreases.
    pub total_earnings_cents: i64,
    pub quality_score: f64,
    pub badge: String,
    pub total_leads_submitted: i64,
    pub total_leads_approved: i64,
    pub total_leads_sold: i64,
    /// External payout destination reference; required for settlement.
    pub payout_account: Option<String>,
    pub onboarding_complete: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a scout at onboarding.
#[derive(Debug, Deserialize)]
pub struct CreateScout {
    pub external_user_id: String,
    pub name: String,
    pub email: String,
}
