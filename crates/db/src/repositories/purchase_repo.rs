//! Repository for the write-once `purchases` table.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::types::DbId;

use crate::models::purchase::Purchase;

/// Column list shared across queries.
const COLUMNS: &str = "\
    id, company_id, lead_id, scout_id, purchase_price_cents, scout_earning_cents, \
    platform_commission_cents, status, created_at";

/// Provides insert and query operations for purchase records.
pub struct PurchaseRepo;

impl PurchaseRepo {
    /// Insert the immutable purchase record inside the purchase
    /// transaction. The partial unique index on `lead_id` backstops the
    /// one-active-purchase-per-lead invariant.
    pub async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
        lead_id: DbId,
        scout_id: DbId,
        purchase_price_cents: i64,
        scout_earning_cents: i64,
        platform_commission_cents: i64,
    ) -> Result<Purchase, sqlx::Error> {
        let query = format!(
            "INSERT INTO purchases \
                (company_id, lead_id, scout_id, purchase_price_cents, \
                 scout_earning_cents, platform_commission_cents) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(company_id)
            .bind(lead_id)
            .bind(scout_id)
            .bind(purchase_price_cents)
            .bind(scout_earning_cents)
            .bind(platform_commission_cents)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a purchase by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Purchase>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchases WHERE id = $1");
        sqlx::query_as::<_, Purchase>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a company's purchases, newest first.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases \
             WHERE company_id = $1 \
             ORDER BY id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a scout's sales, newest first.
    pub async fn list_for_scout(
        pool: &PgPool,
        scout_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Purchase>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchases \
             WHERE scout_id = $1 \
             ORDER BY id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Purchase>(&query)
            .bind(scout_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
