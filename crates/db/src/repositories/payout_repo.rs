//! Repository for the `payouts` table.
//!
//! A payout row records one settlement attempt. The partial unique index
//! on open (`pending`/`processing`) payouts per scout is the database
//! backstop for the batch processor's no-double-pay guarantee.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::types::DbId;

use crate::models::payout::{
    Payout, PAYOUT_COMPLETED, PAYOUT_FAILED, PAYOUT_PENDING, PAYOUT_PROCESSING,
};

/// Column list shared across queries.
const COLUMNS: &str = "\
    id, scout_id, amount_cents, status, external_transfer_id, failure_reason, \
    created_at, updated_at";

/// Provides settlement-attempt operations for payouts.
pub struct PayoutRepo;

impl PayoutRepo {
    /// Insert a `pending` payout snapshotting the settlement amount.
    /// Runs inside the creation transaction that holds the scout lock.
    pub async fn insert_pending_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        scout_id: DbId,
        amount_cents: i64,
    ) -> Result<Payout, sqlx::Error> {
        let query = format!(
            "INSERT INTO payouts (scout_id, amount_cents) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payout>(&query)
            .bind(scout_id)
            .bind(amount_cents)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a payout by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payouts WHERE id = $1");
        sqlx::query_as::<_, Payout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// True if the scout already has an open (pending or processing)
    /// settlement attempt.
    pub async fn has_open_for_scout(pool: &PgPool, scout_id: DbId) -> Result<bool, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payouts \
             WHERE scout_id = $1 AND status IN ($2, $3)",
        )
        .bind(scout_id)
        .bind(PAYOUT_PENDING)
        .bind(PAYOUT_PROCESSING)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// Move a payout to `processing` before the external transfer call.
    pub async fn mark_processing(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE payouts SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(PAYOUT_PROCESSING)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a payout `completed` with the external transfer id, inside the
    /// settlement transaction that moves the scout's earnings.
    pub async fn mark_completed_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        external_transfer_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE payouts SET \
                status = $2, \
                external_transfer_id = $3, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(PAYOUT_COMPLETED)
        .bind(external_transfer_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Mark a payout `failed` with the provider's opaque reason. Earnings
    /// balances are deliberately untouched.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        failure_reason: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE payouts SET \
                status = $2, \
                failure_reason = $3, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(PAYOUT_FAILED)
        .bind(failure_reason)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List a scout's payouts, newest first.
    pub async fn list_for_scout(
        pool: &PgPool,
        scout_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Payout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payouts \
             WHERE scout_id = $1 \
             ORDER BY id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Payout>(&query)
            .bind(scout_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
