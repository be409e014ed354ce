//! Lead moderation audit log model.

use leadex_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An append-only row from the `lead_moderation_logs` table. Every
/// non-initial lifecycle transition is recorded with its acting principal.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ModerationLog {
    pub id: DbId,
    pub lead_id: DbId,
    /// Identity-provider subject of the actor (admin, or the purchase
    /// orchestrator's system principal for sale transitions).
    pub actor_external_id: String,
    pub action: String,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}
