//! Route definitions for the `/companies` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// POST   /               -> register_company
/// GET    /me             -> get_profile
/// PUT    /me             -> update_profile
/// GET    /me/ledger      -> list_ledger
/// GET    /me/purchases   -> list_purchases
/// POST   /me/renew       -> renew_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(companies::register_company))
        .route(
            "/me",
            get(companies::get_profile).put(companies::update_profile),
        )
        .route("/me/ledger", get(companies::list_ledger))
        .route("/me/purchases", get(companies::list_purchases))
        .route("/me/renew", post(companies::renew_subscription))
}
