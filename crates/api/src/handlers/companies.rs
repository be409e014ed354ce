//! Handlers for the `/companies` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leadex_core::error::CoreError;
use leadex_core::validation::validate_email;
use leadex_db::models::company::{CreateCompany, UpdateCompany};
use leadex_db::repositories::{CompanyRepo, LedgerRepo, PurchaseRepo};
use leadex_events::MarketEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::current_company;
use crate::middleware::rbac::RequireCompany;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / query types
// ---------------------------------------------------------------------------

/// Body for `POST /companies`: the profile a buyer creates after
/// checkout. The identity comes from the access token, never the body.
#[derive(Debug, Deserialize)]
pub struct RegisterCompany {
    pub name: String,
    pub contact_email: String,
    pub subscription_plan: Option<String>,
    pub matching_preferences: Option<serde_json::Value>,
}

/// Pagination for ledger and purchase listings.
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

/// POST /api/v1/companies
///
/// Create the company profile for the authenticated account and allocate
/// the subscription plan's first period of credits through the ledger.
pub async fn register_company(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
    Json(input): Json<RegisterCompany>,
) -> AppResult<impl IntoResponse> {
    if CompanyRepo::find_by_external_id(&state.pool, &auth.external_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::InvalidState(
            "A company profile already exists for this account".into(),
        )));
    }
    validate_email("contact_email", &input.contact_email)?;

    let plan = input.subscription_plan.as_deref().unwrap_or("starter");
    let credits = plan_credits(&state, plan)?;

    let company = CompanyRepo::create(
        &state.pool,
        &CreateCompany {
            external_user_id: auth.external_id.clone(),
            name: input.name,
            contact_email: input.contact_email,
            subscription_plan: Some(plan.to_string()),
            matching_preferences: input.matching_preferences,
        },
    )
    .await?;
    let company = CompanyRepo::renew_subscription(&state.pool, company.id, credits).await?;

    state.event_bus.publish(MarketEvent::CreditsAllocated {
        company_id: company.id,
        credits,
    });

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": company })),
    ))
}

/// GET /api/v1/companies/me
pub async fn get_profile(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let company = current_company(&state.pool, &auth).await?;
    Ok(Json(serde_json::json!({ "data": company })))
}

/// PUT /api/v1/companies/me
pub async fn update_profile(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(email) = &input.contact_email {
        validate_email("contact_email", email)?;
    }
    let company = current_company(&state.pool, &auth).await?;
    let updated = CompanyRepo::update_profile(&state.pool, company.id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Company",
            id: company.id,
        })?;
    Ok(Json(serde_json::json!({ "data": updated })))
}

// ---------------------------------------------------------------------------
// Ledger and purchases
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/me/ledger
///
/// The company's credit transaction history, oldest first.
pub async fn list_ledger(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let company = current_company(&state.pool, &auth).await?;
    let (limit, offset) = page(&params);
    let entries = LedgerRepo::list_for_company(&state.pool, company.id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "data": entries })))
}

/// GET /api/v1/companies/me/purchases
pub async fn list_purchases(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let company = current_company(&state.pool, &auth).await?;
    let (limit, offset) = page(&params);
    let purchases = PurchaseRepo::list_for_company(&state.pool, company.id, limit, offset).await?;
    Ok(Json(serde_json::json!({ "data": purchases })))
}

// ---------------------------------------------------------------------------
// Subscription renewal
// ---------------------------------------------------------------------------

/// POST /api/v1/companies/me/renew
///
/// Allocate the subscription plan's period credits via the ledger and
/// reset the period quota.
pub async fn renew_subscription(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let company = current_company(&state.pool, &auth).await?;
    let credits = plan_credits(&state, &company.subscription_plan)?;

    let renewed = CompanyRepo::renew_subscription(&state.pool, company.id, credits).await?;

    tracing::info!(
        company_id = company.id,
        plan = %company.subscription_plan,
        credits,
        "Subscription renewed"
    );
    state.event_bus.publish(MarketEvent::CreditsAllocated {
        company_id: company.id,
        credits,
    });

    Ok(Json(serde_json::json!({ "data": renewed })))
}

/// Credits allocated per period for a plan, from the configured table.
fn plan_credits(state: &AppState, plan: &str) -> Result<i64, AppError> {
    state.market.plan_credits.get(plan).copied().ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown subscription plan: '{plan}'"
        )))
    })
}
