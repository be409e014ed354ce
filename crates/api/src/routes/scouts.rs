//! Route definitions for the `/scouts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scouts;
use crate::state::AppState;

/// Routes mounted at `/scouts`.
///
/// ```text
/// POST   /                        -> register_scout
/// GET    /me                      -> get_profile
/// POST   /me/complete-onboarding  -> complete_onboarding
/// GET    /me/leads                -> list_leads
/// GET    /me/sales                -> list_sales
/// GET    /me/payouts              -> list_payouts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scouts::register_scout))
        .route("/me", get(scouts::get_profile))
        .route("/me/complete-onboarding", post(scouts::complete_onboarding))
        .route("/me/leads", get(scouts::list_leads))
        .route("/me/sales", get(scouts::list_sales))
        .route("/me/payouts", get(scouts::list_payouts))
}
