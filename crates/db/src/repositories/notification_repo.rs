//! Repository for the `notifications` table.

use sqlx::PgPool;

use leadex_core::types::DbId;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, recipient_external_id, kind, title, message, payload, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Create a notification row, returning the generated ID.
    pub async fn create(
        pool: &PgPool,
        recipient_external_id: &str,
        kind: &str,
        title: &str,
        message: &str,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (recipient_external_id, kind, title, message, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id",
        )
        .bind(recipient_external_id)
        .bind(kind)
        .bind(title)
        .bind(message)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// List notifications for a recipient.
    ///
    /// When `unread_only` is `true`, only unread notifications are
    /// returned.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_external_id: &str,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = FALSE"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_external_id = $1 {filter} \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_external_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification belonged to the recipient and
    /// was updated, `false` otherwise.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        recipient_external_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = NOW() \
             WHERE id = $1 AND recipient_external_id = $2 AND is_read = FALSE",
        )
        .bind(notification_id)
        .bind(recipient_external_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read for a recipient, returning
    /// the number marked.
    pub async fn mark_all_read(
        pool: &PgPool,
        recipient_external_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = TRUE, read_at = NOW() \
             WHERE recipient_external_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_external_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of unread notifications for a recipient.
    pub async fn unread_count(
        pool: &PgPool,
        recipient_external_id: &str,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE recipient_external_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_external_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
