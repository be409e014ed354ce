//! The credit ledger: company balances plus the append-only
//! `credit_transactions` log.
//!
//! Every balance change flows through [`LedgerRepo::add`] or
//! [`LedgerRepo::deduct`]. Each locks the company row, writes the new
//! balance, and appends exactly one ledger row whose `balance_after`
//! matches it, all in one transaction, so the replay invariant (summing
//! `amount` over a company's rows equals `credits_remaining`) holds at
//! every commit point.

use sqlx::{PgPool, Postgres, Transaction};

use leadex_core::error::CoreError;
use leadex_core::types::DbId;

use crate::error::DbError;
use crate::models::credit_transaction::CreditTransaction;

/// Column list for `credit_transactions` queries.
const COLUMNS: &str =
    "id, company_id, kind, amount, balance_after, description, related_purchase_id, created_at";

/// Ledger operations for company credit balances.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Credit a company's balance (`allocation` or `refund` kinds).
    ///
    /// `amount` must be positive; the appended ledger row carries it as a
    /// positive delta.
    pub async fn add(
        pool: &PgPool,
        company_id: DbId,
        amount: i64,
        kind: &str,
        description: &str,
    ) -> Result<CreditTransaction, DbError> {
        let mut tx = pool.begin().await?;
        let entry = Self::add_in_tx(&mut tx, company_id, amount, kind, description).await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Debit a company's balance (`purchase` or `usage` kinds).
    ///
    /// Fails with [`CoreError::InsufficientCredits`] if the balance would
    /// go negative; nothing is written on failure.
    pub async fn deduct(
        pool: &PgPool,
        company_id: DbId,
        amount: i64,
        kind: &str,
        description: &str,
        related_purchase_id: Option<DbId>,
    ) -> Result<CreditTransaction, DbError> {
        let mut tx = pool.begin().await?;
        let entry = Self::deduct_in_tx(
            &mut tx,
            company_id,
            amount,
            kind,
            description,
            related_purchase_id,
        )
        .await?;
        tx.commit().await?;
        Ok(entry)
    }

    /// Credit variant composable into a larger atomic unit. The caller
    /// owns the transaction; nothing is visible until it commits.
    pub async fn add_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
        amount: i64,
        kind: &str,
        description: &str,
    ) -> Result<CreditTransaction, DbError> {
        debug_assert!(amount > 0, "ledger credits must be positive");
        let balance = Self::lock_balance(tx, company_id).await?;
        let new_balance = balance + amount;
        Self::write_balance(tx, company_id, new_balance).await?;
        let entry =
            Self::append_entry(tx, company_id, kind, amount, new_balance, description, None)
                .await?;
        Ok(entry)
    }

    /// Debit variant composable into a larger atomic unit.
    pub async fn deduct_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
        amount: i64,
        kind: &str,
        description: &str,
        related_purchase_id: Option<DbId>,
    ) -> Result<CreditTransaction, DbError> {
        debug_assert!(amount > 0, "ledger debits must be positive");
        let balance = Self::lock_balance(tx, company_id).await?;
        if amount > balance {
            return Err(CoreError::InsufficientCredits {
                required: amount,
                available: balance,
            }
            .into());
        }
        let new_balance = balance - amount;
        Self::write_balance(tx, company_id, new_balance).await?;
        let entry = Self::append_entry(
            tx,
            company_id,
            kind,
            -amount,
            new_balance,
            description,
            related_purchase_id,
        )
        .await?;
        Ok(entry)
    }

    /// List a company's ledger entries, oldest first.
    pub async fn list_for_company(
        pool: &PgPool,
        company_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreditTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM credit_transactions \
             WHERE company_id = $1 \
             ORDER BY id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Sum of all ledger deltas for a company. Equals the company's
    /// `credits_remaining` whenever the replay invariant holds.
    pub async fn replay_balance(pool: &PgPool, company_id: DbId) -> Result<i64, sqlx::Error> {
        let sum: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(amount)::BIGINT FROM credit_transactions WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await?;
        Ok(sum.unwrap_or(0))
    }

    /// Lock the company row and return its current balance.
    async fn lock_balance(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
    ) -> Result<i64, DbError> {
        let balance: Option<i64> =
            sqlx::query_scalar("SELECT credits_remaining FROM companies WHERE id = $1 FOR UPDATE")
                .bind(company_id)
                .fetch_optional(&mut **tx)
                .await?;
        balance.ok_or_else(|| {
            CoreError::NotFound {
                entity: "Company",
                id: company_id,
            }
            .into()
        })
    }

    async fn write_balance(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
        new_balance: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE companies SET credits_remaining = $2, updated_at = NOW() WHERE id = $1")
            .bind(company_id)
            .bind(new_balance)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn append_entry(
        tx: &mut Transaction<'_, Postgres>,
        company_id: DbId,
        kind: &str,
        amount: i64,
        balance_after: i64,
        description: &str,
        related_purchase_id: Option<DbId>,
    ) -> Result<CreditTransaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO credit_transactions \
                (company_id, kind, amount, balance_after, description, related_purchase_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CreditTransaction>(&query)
            .bind(company_id)
            .bind(kind)
            .bind(amount)
            .bind(balance_after)
            .bind(description)
            .bind(related_purchase_id)
            .fetch_one(&mut **tx)
            .await
    }
}
