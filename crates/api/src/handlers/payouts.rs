//! Admin handlers for payout batch operations.

use axum::extract::State;
use axum::Json;

use leadex_market::PayoutProcessor;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// POST /api/v1/admin/payouts/run
///
/// Run a settlement batch immediately and return the aggregate summary.
/// The same processor the scheduler drives; useful for operational
/// catch-up runs. Idempotent per earnings snapshot, so triggering it
/// alongside the schedule cannot double-pay.
pub async fn run_batch(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    tracing::info!(actor = %auth.external_id, "Manual payout batch triggered");

    let processor = PayoutProcessor::new(
        state.pool.clone(),
        (*state.market).clone(),
        state.transfer_provider.clone(),
        state.event_bus.clone(),
    );
    let summary = processor.run_batch().await?;

    Ok(Json(serde_json::json!({ "data": summary })))
}
