//! Handlers for the `/leads` resource: submission, editing, browsing,
//! moderation, and purchase.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use leadex_core::config::MarketplaceConfig;
use leadex_core::error::CoreError;
use leadex_core::lifecycle::{self, ACTION_APPROVE};
use leadex_core::pricing::price_for_category;
use leadex_core::quality::{lead_quality_score, LeadQualityInput};
use leadex_core::roles::{ROLE_ADMIN, ROLE_COMPANY, ROLE_SCOUT};
use leadex_core::types::DbId;
use leadex_core::validation::{validate_lead_fields, LeadFields};
use leadex_db::models::lead::{CreateLead, Lead, UpdateLead};
use leadex_db::repositories::{LeadRepo, ModerationLogRepo, ScoutRepo};
use leadex_events::MarketEvent;
use leadex_market::PurchaseService;

use crate::error::{AppError, AppResult};
use crate::handlers::{current_company, current_scout, refresh_scout_reputation};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireCompany, RequireScout};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /leads`.
#[derive(Debug, Deserialize)]
pub struct LeadQuery {
    /// Restrict the browsable listing to one category.
    pub category: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Body for `POST /leads/{id}/moderate`.
#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub action: String,
    pub reason: Option<String>,
}

/// Maximum page size for lead listings.
const MAX_LIMIT: i64 = 100;

/// Default page size for lead listings.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Scoring helper
// ---------------------------------------------------------------------------

/// Score the current field values of a lead with the submitting scout's
/// reputation.
fn score_fields(fields: &LeadFields<'_>, scout_reputation: f64, market: &MarketplaceConfig) -> f64 {
    lead_quality_score(
        &LeadQualityInput {
            description: fields.description,
            has_email: true,
            has_phone: fields.contact_phone.is_some(),
            has_website: fields.contact_website.is_some(),
            has_budget: fields.budget_cents.is_some(),
            photo_count: fields.photo_urls.len(),
            scout_reputation,
        },
        &market.quality,
    )
}

// ---------------------------------------------------------------------------
// Submission and editing (scout)
// ---------------------------------------------------------------------------

/// POST /api/v1/leads
///
/// Submit a new lead. Validates the fields, scores quality with the
/// scout's current reputation, and leaves the lead in `pending_review`.
pub async fn submit_lead(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Json(input): Json<CreateLead>,
) -> AppResult<impl IntoResponse> {
    let scout = current_scout(&state.pool, &auth).await?;

    let fields = LeadFields {
        title: &input.title,
        description: &input.description,
        category: &input.category,
        contact_email: &input.contact_email,
        contact_phone: input.contact_phone.as_deref(),
        contact_website: input.contact_website.as_deref(),
        budget_cents: input.budget_cents,
        photo_urls: &input.photo_urls,
    };
    validate_lead_fields(&fields)?;
    let quality = score_fields(&fields, scout.quality_score, &state.market);

    let lead = LeadRepo::create(&state.pool, scout.id, &input, quality).await?;
    ScoutRepo::increment_submitted(&state.pool, scout.id).await?;
    refresh_scout_reputation(&state.pool, &state.market, scout.id).await?;

    state.event_bus.publish(MarketEvent::LeadSubmitted {
        lead_id: lead.id,
        scout_id: scout.id,
    });

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": lead })),
    ))
}

/// PUT /api/v1/leads/{id}
///
/// Edit a lead while it is still reviewable. Any edit resets moderation
/// back to `pending` and re-scores quality from the merged fields.
pub async fn edit_lead(
    RequireScout(auth): RequireScout,
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<Json<serde_json::Value>> {
    let scout = current_scout(&state.pool, &auth).await?;
    let lead = LeadRepo::find_by_id(&state.pool, lead_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;

    if lead.scout_id != scout.id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the submitting scout may edit a lead".into(),
        )));
    }
    if !lifecycle::is_editable(&lead.status) {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "lead {lead_id} can no longer be edited (status: {})",
            lead.status
        ))));
    }

    // Validate and score the merged field values, not just the patch.
    let photo_urls = input.photo_urls.as_ref().unwrap_or(&lead.photo_urls);
    let fields = LeadFields {
        title: input.title.as_deref().unwrap_or(&lead.title),
        description: input.description.as_deref().unwrap_or(&lead.description),
        category: input.category.as_deref().unwrap_or(&lead.category),
        contact_email: input.contact_email.as_deref().unwrap_or(&lead.contact_email),
        contact_phone: input.contact_phone.as_deref().or(lead.contact_phone.as_deref()),
        contact_website: input
            .contact_website
            .as_deref()
            .or(lead.contact_website.as_deref()),
        budget_cents: input.budget_cents.or(lead.budget_cents),
        photo_urls,
    };
    validate_lead_fields(&fields)?;
    let quality = score_fields(&fields, scout.quality_score, &state.market);

    let updated = LeadRepo::apply_edit(&state.pool, lead_id, scout.id, &input, quality)
        .await?
        .ok_or_else(|| {
            CoreError::InvalidState(format!("lead {lead_id} can no longer be edited"))
        })?;

    Ok(Json(serde_json::json!({ "data": updated })))
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// GET /api/v1/leads
///
/// Scouts see their own submissions; companies and admins browse the
/// approved, unsold inventory (optionally by category).
pub async fn list_leads(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LeadQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let offset = params.offset.unwrap_or(0);

    let data = match auth.role.as_str() {
        ROLE_SCOUT => {
            let scout = current_scout(&state.pool, &auth).await?;
            let leads = LeadRepo::list_for_scout(&state.pool, scout.id, limit, offset).await?;
            serde_json::json!(leads)
        }
        ROLE_ADMIN => {
            let leads =
                LeadRepo::list_browsable(&state.pool, params.category.as_deref(), limit, offset)
                    .await?;
            serde_json::json!(leads)
        }
        ROLE_COMPANY => {
            // Contact details stay hidden until the lead is bought.
            let leads =
                LeadRepo::list_browsable(&state.pool, params.category.as_deref(), limit, offset)
                    .await?;
            serde_json::json!(leads.iter().map(redact_contacts).collect::<Vec<_>>())
        }
        other => {
            return Err(AppError::Core(CoreError::Forbidden(format!(
                "Unknown role: {other}"
            ))))
        }
    };

    Ok(Json(serde_json::json!({ "data": data })))
}

/// GET /api/v1/leads/{id}
///
/// Visibility: admins always; scouts their own leads; companies any
/// purchasable lead plus leads they have bought.
pub async fn get_lead(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let lead = LeadRepo::find_by_id(&state.pool, lead_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;

    let data = match auth.role.as_str() {
        ROLE_ADMIN => serde_json::json!(lead),
        ROLE_SCOUT => {
            let scout = current_scout(&state.pool, &auth).await?;
            if lead.scout_id != scout.id {
                return Err(forbidden_lead());
            }
            serde_json::json!(lead)
        }
        ROLE_COMPANY => {
            let company = current_company(&state.pool, &auth).await?;
            if lead.purchased_by == Some(company.id) {
                // Buyers see everything, including contact details.
                serde_json::json!(lead)
            } else if lifecycle::is_purchasable(&lead.status, lead.purchased_by) {
                redact_contacts(&lead)
            } else {
                return Err(forbidden_lead());
            }
        }
        _ => return Err(forbidden_lead()),
    };

    Ok(Json(serde_json::json!({ "data": data })))
}

// ---------------------------------------------------------------------------
// Moderation (admin)
// ---------------------------------------------------------------------------

/// POST /api/v1/leads/{id}/moderate
///
/// Apply an admin decision (`approve`, `reject`, `request_changes`) to a
/// lead awaiting review. Approval fixes the sale price from the category
/// price table. The transition and its audit-log entry commit together.
pub async fn moderate_lead(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
    Json(request): Json<ModerateRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let (new_status, new_moderation_status) = lifecycle::moderation_outcome(&request.action)?;

    let lead = LeadRepo::find_by_id(&state.pool, lead_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lead",
            id: lead_id,
        })?;
    if !lifecycle::can_moderate(&lead.status) {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "lead {lead_id} is not awaiting review (status: {})",
            lead.status
        ))));
    }

    let sale_price = if request.action == ACTION_APPROVE {
        Some(price_for_category(&state.market, &lead.category))
    } else {
        None
    };

    let mut tx = state.pool.begin().await.map_err(AppError::Database)?;
    let updated = LeadRepo::apply_moderation(
        &mut tx,
        lead_id,
        new_status,
        new_moderation_status,
        sale_price,
    )
    .await?
    .ok_or_else(|| CoreError::InvalidState(format!("lead {lead_id} was moderated concurrently")))?;
    ModerationLogRepo::insert_in_tx(
        &mut tx,
        lead_id,
        &auth.external_id,
        &request.action,
        request.reason.as_deref(),
    )
    .await?;
    tx.commit().await.map_err(AppError::Database)?;

    if request.action == ACTION_APPROVE {
        ScoutRepo::increment_approved(&state.pool, lead.scout_id).await?;
        refresh_scout_reputation(&state.pool, &state.market, lead.scout_id).await?;
    }

    tracing::info!(
        lead_id,
        action = %request.action,
        actor = %auth.external_id,
        "Lead moderated"
    );
    state.event_bus.publish(MarketEvent::LeadModerated {
        lead_id,
        scout_id: lead.scout_id,
        action: request.action,
        reason: request.reason,
    });

    Ok(Json(serde_json::json!({ "data": updated })))
}

/// GET /api/v1/leads/{id}/moderation-log
///
/// The lead's full moderation history (admin only).
pub async fn moderation_log(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let entries = ModerationLogRepo::list_for_lead(&state.pool, lead_id).await?;
    Ok(Json(serde_json::json!({ "data": entries })))
}

// ---------------------------------------------------------------------------
// Purchase (company)
// ---------------------------------------------------------------------------

/// POST /api/v1/leads/{id}/purchase
///
/// Buy a lead for one credit. The whole sale is atomic; see
/// [`PurchaseService::purchase`] for the contract.
pub async fn purchase_lead(
    RequireCompany(auth): RequireCompany,
    State(state): State<AppState>,
    Path(lead_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let company = current_company(&state.pool, &auth).await?;

    let purchase = PurchaseService::purchase(
        &state.pool,
        &state.market,
        &state.event_bus,
        lead_id,
        company.id,
    )
    .await?;

    Ok(Json(serde_json::json!({ "data": purchase })))
}

/// The lead payload stripped of buyer-only contact details, for
/// companies browsing inventory they have not purchased.
fn redact_contacts(lead: &Lead) -> serde_json::Value {
    serde_json::json!({
        "id": lead.id,
        "category": lead.category,
        "title": lead.title,
        "description": lead.description,
        "budget_cents": lead.budget_cents,
        "photo_urls": lead.photo_urls,
        "quality_score": lead.quality_score,
        "sale_price_cents": lead.sale_price_cents,
        "created_at": lead.created_at,
    })
}

fn forbidden_lead() -> AppError {
    AppError::Core(CoreError::Forbidden(
        "You do not have access to this lead".into(),
    ))
}
