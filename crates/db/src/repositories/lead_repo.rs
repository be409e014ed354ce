//! Repository for the `leads` table.
//!
//! Lifecycle transitions are guarded UPDATEs: the WHERE clause re-checks
//! the source state so a concurrent transition loses cleanly (zero rows
//! affected) instead of clobbering.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::lifecycle::{
    MODERATION_PENDING, STATUS_APPROVED, STATUS_PENDING_REVIEW, STATUS_SOLD,
};
use leadex_core::types::DbId;

use crate::models::lead::{CreateLead, Lead, UpdateLead};

/// Column list shared across queries.
const COLUMNS: &str = "\
    id, scout_id, category, title, description, contact_email, contact_phone, \
    contact_website, budget_cents, photo_urls, status, moderation_status, \
    quality_score, sale_price_cents, purchased_by, purchased_at, created_at, updated_at";

/// Provides CRUD and lifecycle operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a newly submitted lead with its computed quality score.
    pub async fn create(
        pool: &PgPool,
        scout_id: DbId,
        input: &CreateLead,
        quality_score: f64,
    ) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads \
                (scout_id, category, title, description, contact_email, contact_phone, \
                 contact_website, budget_cents, photo_urls, quality_score) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(scout_id)
            .bind(&input.category)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.contact_website)
            .bind(input.budget_cents)
            .bind(&input.photo_urls)
            .bind(quality_score)
            .fetch_one(pool)
            .await
    }

    /// Find a lead by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock and return a lead row inside an open transaction.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List approved, unsold leads for company browsing, optionally
    /// filtered by category.
    pub async fn list_browsable(
        pool: &PgPool,
        category: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let filter = if category.is_some() {
            "AND category = $4"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM leads \
             WHERE status = $1 AND purchased_by IS NULL {filter} \
             ORDER BY quality_score DESC, created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        let mut q = sqlx::query_as::<_, Lead>(&query)
            .bind(STATUS_APPROVED)
            .bind(limit)
            .bind(offset);
        if let Some(category) = category {
            q = q.bind(category);
        }
        q.fetch_all(pool).await
    }

    /// List a scout's own leads, newest first.
    pub async fn list_for_scout(
        pool: &PgPool,
        scout_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lead>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM leads \
             WHERE scout_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(scout_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply a scout edit to a reviewable lead, resetting moderation to
    /// `pending` and re-storing the recomputed quality score.
    ///
    /// Returns `None` when the lead is no longer editable (already
    /// approved, rejected, or sold) or is not owned by `scout_id`.
    pub async fn apply_edit(
        pool: &PgPool,
        id: DbId,
        scout_id: DbId,
        input: &UpdateLead,
        quality_score: f64,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET \
                category = COALESCE($4, category), \
                title = COALESCE($5, title), \
                description = COALESCE($6, description), \
                contact_email = COALESCE($7, contact_email), \
                contact_phone = COALESCE($8, contact_phone), \
                contact_website = COALESCE($9, contact_website), \
                budget_cents = COALESCE($10, budget_cents), \
                photo_urls = COALESCE($11, photo_urls), \
                quality_score = $12, \
                status = '{STATUS_PENDING_REVIEW}', \
                moderation_status = '{MODERATION_PENDING}', \
                updated_at = NOW() \
             WHERE id = $1 AND scout_id = $2 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(scout_id)
            .bind(STATUS_PENDING_REVIEW)
            .bind(&input.category)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .bind(&input.contact_website)
            .bind(input.budget_cents)
            .bind(&input.photo_urls)
            .bind(quality_score)
            .fetch_optional(pool)
            .await
    }

    /// Apply a moderation decision to a lead still awaiting review.
    ///
    /// `sale_price_cents` is set on approval (fixed from the category price
    /// table) and passed as `None` otherwise. Returns `None` when the lead
    /// was not in `pending_review` (a concurrent moderation won).
    pub async fn apply_moderation(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        new_status: &str,
        new_moderation_status: &str,
        sale_price_cents: Option<i64>,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET \
                status = $2, \
                moderation_status = $3, \
                sale_price_cents = COALESCE($4, sale_price_cents), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $5 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(new_status)
            .bind(new_moderation_status)
            .bind(sale_price_cents)
            .bind(STATUS_PENDING_REVIEW)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Flip a lead to `sold` inside the purchase transaction.
    ///
    /// The WHERE clause re-checks the purchasable predicate under the row
    /// lock; `false` means a concurrent purchase already won and the
    /// caller must roll back.
    pub async fn mark_sold_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        company_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE leads SET \
                status = $3, \
                purchased_by = $2, \
                purchased_at = NOW(), \
                updated_at = NOW() \
             WHERE id = $1 AND status = $4 AND purchased_by IS NULL",
        )
        .bind(id)
        .bind(company_id)
        .bind(STATUS_SOLD)
        .bind(STATUS_APPROVED)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
