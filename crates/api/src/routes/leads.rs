//! Route definitions for the `/leads` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// Routes mounted at `/leads`.
///
/// ```text
/// GET    /                      -> list_leads (role-scoped)
/// POST   /                      -> submit_lead (scout)
/// GET    /{id}                  -> get_lead (role-scoped)
/// PUT    /{id}                  -> edit_lead (owning scout)
/// POST   /{id}/moderate         -> moderate_lead (admin)
/// GET    /{id}/moderation-log   -> moderation_log (admin)
/// POST   /{id}/purchase         -> purchase_lead (company)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(leads::list_leads).post(leads::submit_lead))
        .route("/{id}", get(leads::get_lead).put(leads::edit_lead))
        .route("/{id}/moderate", post(leads::moderate_lead))
        .route("/{id}/moderation-log", get(leads::moderation_log))
        .route("/{id}/purchase", post(leads::purchase_lead))
}
