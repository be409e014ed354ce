//! Handlers for the `/scouts` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leadex_core::error::CoreError;
use leadex_core::validation::validate_email;
use leadex_db::models::scout::CreateScout;
use leadex_db::repositories::{LeadRepo, PayoutRepo, PurchaseRepo, ScoutRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::current_scout;
use crate::middleware::rbac::RequireScout;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Body for `POST /scouts`.
#[derive(Debug, Deserialize)]
pub struct RegisterScout {
    pub name: String,
    pub email: String,
}

/// Body for `POST /scouts/me/complete-onboarding`.
#[derive(Debug, Deserialize)]
pub struct CompleteOnboarding {
    /// External payout destination reference (e.g. a connected account id).
    pub payout_account: String,
}

/// Pagination for lead, sale, and payout listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

const MAX_LIMIT: i64 = 100;
const DEFAULT_LIMIT: i64 = 50;

fn page(params: &PageQuery) -> (i64, i64) {
    (
        params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        params.offset.unwrap_or(0),
    )
}

// ---------------------------------------------------------------------------
// Registration and profile
// ---------------------------------------------------------------------------

/// POST /api/v1/scouts
///
/// Create the scout profile for the authenticated account.
pub async fn register_scout(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Json(input): Json<RegisterScout>,
) -> AppResult<impl IntoResponse> {
    if ScoutRepo::find_by_external_id(&state.pool, &auth.external_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::InvalidState(
            "A scout profile already exists for this account".into(),
        )));
    }
    validate_email("email", &input.email)?;

    let scout = ScoutRepo::create(
        &state.pool,
        &CreateScout {
            external_user_id: auth.external_id.clone(),
            name: input.name,
            email: input.email,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": scout })),
    ))
}

/// GET /api/v1/scouts/me
///
/// The scout's profile: earnings, reputation, badge, lifetime counters.
pub async fn get_profile(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let scout = current_scout(&state.pool, &auth).await?;
    Ok(Json(serde_json::json!({ "data": scout })))
}

/// POST /api/v1/scouts/me/complete-onboarding
///
/// Record the external payout destination and mark the scout eligible for
/// settlement.
pub async fn complete_onboarding(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Json(input): Json<CompleteOnboarding>,
) -> AppResult<Json<serde_json::Value>> {
    if input.payout_account.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "payout_account must not be empty".into(),
        )));
    }
    let scout = current_scout(&state.pool, &auth).await?;
    let updated = ScoutRepo::complete_onboarding(&state.pool, scout.id, &input.payout_account)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Scout",
            id: scout.id,
        })?;
    Ok(Json(serde_json::json!({ "data": updated })))
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

/// GET /api/v1/scouts/me/leads
pub async fn list_leads(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let scout = current_scout(&state.pool, &auth).await?;
    let (limit, offset) = page(&params);
    let leads = LeadRepo::list_for_scout(&state.pool, scout.id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "data": leads })))
}

/// GET /api/v1/scouts/me/sales
pub async fn list_sales(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let scout = current_scout(&state.pool, &auth).await?;
    let (limit, offset) = page(&params);
    let sales = PurchaseRepo::list_for_scout(&state.pool, scout.id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "data": sales })))
}

/// GET /api/v1/scouts/me/payouts
pub async fn list_payouts(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let scout = current_scout(&state.pool, &auth).await?;
    let (limit, offset) = page(&params);
    let payouts = PayoutRepo::list_for_scout(&state.pool, scout.id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "data": payouts })))
}
