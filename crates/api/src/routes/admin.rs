//! Route definitions for admin-only operations.

use axum::routing::post;
use axum::Router;

use crate::handlers::payouts;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /payouts/run   -> run a settlement batch now
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/payouts/run", post(payouts::run_batch))
}
