//! Company entity models and DTOs.

use leadex_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    /// Stable subject id issued by the external identity provider.
    pub external_user_id: String,
    pub name: String,
    pub contact_email: String,
    pub credits_remaining: i64,
    pub credits_allocated: i64,
    pub subscription_plan: String,
    pub subscription_status: String,
    pub matching_preferences: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a company at onboarding.
#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub external_user_id: String,
    pub name: String,
    pub contact_email: String,
    pub subscription_plan: Option<String>,
    pub matching_preferences: Option<serde_json::Value>,
}

/// DTO for updating company profile fields.
#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub matching_preferences: Option<serde_json::Value>,
}
