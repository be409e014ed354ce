//! Repository for the `scouts` table.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::types::DbId;

use crate::models::scout::{CreateScout, Scout};

/// Column list shared across queries.
const COLUMNS: &str = "\
    id, external_user_id, name, email, pending_earnings_cents, total_earnings_cents, \
    quality_score, badge, total_leads_submitted, total_leads_approved, total_leads_sold, \
    payout_account, onboarding_complete, created_at, updated_at";

/// Provides CRUD, counter, and settlement operations for scouts.
pub struct ScoutRepo;

impl ScoutRepo {
    /// Insert a new scout, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateScout) -> Result<Scout, sqlx::Error> {
        let query = format!(
            "INSERT INTO scouts (external_user_id, name, email) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scout>(&query)
            .bind(&input.external_user_id)
            .bind(&input.name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a scout by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scouts WHERE id = $1");
        sqlx::query_as::<_, Scout>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scout by its identity-provider subject id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_user_id: &str,
    ) -> Result<Option<Scout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scouts WHERE external_user_id = $1");
        sqlx::query_as::<_, Scout>(&query)
            .bind(external_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock and return a scout row inside an open transaction.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Scout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scouts WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Scout>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Mark onboarding complete and record the external payout account.
    pub async fn complete_onboarding(
        pool: &PgPool,
        id: DbId,
        payout_account: &str,
    ) -> Result<Option<Scout>, sqlx::Error> {
        let query = format!(
            "UPDATE scouts SET \
                payout_account = $2, \
                onboarding_complete = TRUE, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scout>(&query)
            .bind(id)
            .bind(payout_account)
            .fetch_optional(pool)
            .await
    }

    /// Bump the lifetime submission counter (lead submit or resubmit-after-edit
    /// does not re-count; callers invoke this only on first submission).
    pub async fn increment_submitted(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE scouts SET total_leads_submitted = total_leads_submitted + 1, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Bump the lifetime approval counter after a moderation approval.
    pub async fn increment_approved(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE scouts SET total_leads_approved = total_leads_approved + 1, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Apply a sale to a locked scout row: accrue the earning, bump the sold
    /// counter, and store the (already monotonically resolved) badge.
    ///
    /// Must run inside the purchase transaction, after the scout row has
    /// been locked with [`Self::find_by_id_for_update`].
    pub async fn apply_sale_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        earning_cents: i64,
        badge: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE scouts SET \
                pending_earnings_cents = pending_earnings_cents + $2, \
                total_leads_sold = total_leads_sold + 1, \
                badge = $3, \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(earning_cents)
        .bind(badge)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Move a settled amount from pending to total earnings, inside the
    /// settlement transaction.
    ///
    /// Returns `false` when the scout's pending earnings no longer cover
    /// the amount (the settlement must then be abandoned, not forced).
    pub async fn settle_earnings_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        amount_cents: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE scouts SET \
                pending_earnings_cents = pending_earnings_cents - $2, \
                total_earnings_cents = total_earnings_cents + $2, \
                updated_at = NOW() \
             WHERE id = $1 AND pending_earnings_cents >= $2",
        )
        .bind(id)
        .bind(amount_cents)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a freshly computed reputation score.
    pub async fn set_reputation(pool: &PgPool, id: DbId, score: f64) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE scouts SET quality_score = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(score)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Average quality score across a scout's leads (0 when they have none).
    pub async fn avg_lead_quality(pool: &PgPool, id: DbId) -> Result<f64, sqlx::Error> {
        let avg: Option<f64> =
            sqlx::query_scalar("SELECT AVG(quality_score) FROM leads WHERE scout_id = $1")
                .bind(id)
                .fetch_one(pool)
                .await?;
        Ok(avg.unwrap_or(0.0))
    }

    /// Scouts whose pending earnings meet the payout threshold, ordered by
    /// id for deterministic batch runs. Includes scouts that will be
    /// skipped for incomplete onboarding; the processor records those in
    /// the batch summary.
    pub async fn list_payout_candidates(
        pool: &PgPool,
        threshold_cents: i64,
    ) -> Result<Vec<Scout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scouts \
             WHERE pending_earnings_cents >= $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, Scout>(&query)
            .bind(threshold_cents)
            .fetch_all(pool)
            .await
    }
}
