//! Error type for composite repository operations.
//!
//! Plain CRUD methods return `sqlx::Error` directly. Operations that also
//! enforce a domain rule inside their transaction (ledger balance checks,
//! guarded lifecycle updates, settlement) return [`DbError`] so callers
//! can distinguish a domain rejection from an infrastructure failure.

use leadex_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
