//! Repository for the append-only `lead_moderation_logs` table.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::types::DbId;

use crate::models::moderation_log::ModerationLog;

/// Column list shared across queries.
const COLUMNS: &str = "id, lead_id, actor_external_id, action, reason, created_at";

/// Provides insert and query operations for the moderation audit trail.
pub struct ModerationLogRepo;

impl ModerationLogRepo {
    /// Append a moderation entry inside the transaction that applies the
    /// transition, so the audit trail can never diverge from the state.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        lead_id: DbId,
        actor_external_id: &str,
        action: &str,
        reason: Option<&str>,
    ) -> Result<ModerationLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO lead_moderation_logs (lead_id, actor_external_id, action, reason) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ModerationLog>(&query)
            .bind(lead_id)
            .bind(actor_external_id)
            .bind(action)
            .bind(reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// List a lead's moderation history, oldest first.
    pub async fn list_for_lead(
        pool: &PgPool,
        lead_id: DbId,
    ) -> Result<Vec<ModerationLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lead_moderation_logs \
             WHERE lead_id = $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, ModerationLog>(&query)
            .bind(lead_id)
            .fetch_all(pool)
            .await
    }
}
