//! Lead entity models and DTOs.

use leadex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `leads` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub scout_id: DbId,
    pub category: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_website: Option<String>,
    pub budget_cents: Option<i64>,
    pub photo_urls: Vec<String>,
    pub status: String,
    pub moderation_status: String,
    pub quality_score: f64,
    /// Fixed from the category price table at approval time.
    pub sale_price_cents: Option<i64>,
    pub purchased_by: Option<DbId>,
    pub purchased_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for submitting a new lead.
#[derive(Debug, Deserialize)]
pub struct CreateLead {
    pub category: String,
    pub title: String,
    pub description: String,
    pub contact_email: String,
    pub contact_phone: Option<String>,
    pub contact_website: Option<String>,
    pub budget_cents: Option<i64>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

/// DTO for editing a lead while it is still reviewable. Absent fields are
/// left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateLead {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_website: Option<String>,
    pub budget_cents: Option<i64>,
    pub photo_urls: Option<Vec<String>>,
}
