//! HTTP handlers, one module per resource.

pub mod companies;
pub mod health;
pub mod leads;
pub mod notifications;
pub mod payouts;
pub mod scouts;

use leadex_core::config::MarketplaceConfig;
use leadex_core::error::CoreError;
use leadex_core::quality::scout_reputation_score;
use leadex_db::models::company::Company;
use leadex_db::models::scout::Scout;
use leadex_db::repositories::{CompanyRepo, ScoutRepo};
use leadex_db::DbPool;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;

/// Resolve the authenticated principal's scout profile.
pub(crate) async fn current_scout(pool: &DbPool, auth: &AuthUser) -> Result<Scout, AppError> {
    ScoutRepo::find_by_external_id(pool, &auth.external_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No scout profile registered for this account".into(),
            ))
        })
}

/// Resolve the authenticated principal's company profile.
pub(crate) async fn current_company(pool: &DbPool, auth: &AuthUser) -> Result<Company, AppError> {
    CompanyRepo::find_by_external_id(pool, &auth.external_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Forbidden(
                "No company profile registered for this account".into(),
            ))
        })
}

/// Recompute and store a scout's reputation from their lifetime counters
/// and the average quality of their leads.
pub(crate) async fn refresh_scout_reputation(
    pool: &DbPool,
    market: &MarketplaceConfig,
    scout_id: i64,
) -> Result<(), AppError> {
    let scout = ScoutRepo::find_by_id(pool, scout_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Scout",
            id: scout_id,
        })?;
    let avg_quality = ScoutRepo::avg_lead_quality(pool, scout_id).await?;
    let score = scout_reputation_score(
        scout.total_leads_sold,
        scout.total_leads_approved,
        scout.total_leads_submitted,
        avg_quality,
        &market.reputation,
    );
    ScoutRepo::set_reputation(pool, scout_id, score).await?;
    Ok(())
}
