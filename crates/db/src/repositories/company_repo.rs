//! Repository for the `companies` table.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::types::DbId;

use crate::error::DbError;
use crate::models::company::{Company, CreateCompany, UpdateCompany};
use crate::models::credit_transaction::KIND_ALLOCATION;
use crate::repositories::LedgerRepo;

/// Column list shared across queries.
const COLUMNS: &str = "\
    id, external_user_id, name, contact_email, credits_remaining, credits_allocated, \
    subscription_plan, subscription_status, matching_preferences, created_at, updated_at";

/// Provides CRUD and subscription operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies \
                (external_user_id, name, contact_email, subscription_plan, matching_preferences) \
             VALUES ($1, $2, $3, COALESCE($4, 'starter'), COALESCE($5, '{{}}'::jsonb)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.external_user_id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.subscription_plan)
            .bind(&input.matching_preferences)
            .fetch_one(pool)
            .await
    }

    /// Find a company by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a company by its identity-provider subject id.
    pub async fn find_by_external_id(
        pool: &PgPool,
        external_user_id: &str,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE external_user_id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(external_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Lock and return a company row inside an open transaction.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Update profile fields. Absent fields are left unchanged.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET \
                name = COALESCE($2, name), \
                contact_email = COALESCE($3, contact_email), \
                matching_preferences = COALESCE($4, matching_preferences), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.matching_preferences)
            .fetch_optional(pool)
            .await
    }

    /// Allocate a subscription period's credits: ledger `allocation` credit
    /// plus the period quota update, in one transaction.
    pub async fn renew_subscription(
        pool: &PgPool,
        id: DbId,
        credits: i64,
    ) -> Result<Company, DbError> {
        let mut tx = pool.begin().await?;

        LedgerRepo::add_in_tx(
            &mut tx,
            id,
            credits,
            KIND_ALLOCATION,
            "Subscription period credit allocation",
        )
        .await?;

        let query = format!(
            "UPDATE companies SET \
                credits_allocated = $2, \
                subscription_status = 'active', \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(credits)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(company)
    }
}
