use std::sync::Arc;

use leadex_core::config::MarketplaceConfig;
use leadex_events::EventBus;
use leadex_payments::TransferProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: leadex_db::DbPool,
    /// Server configuration (bind address, CORS, JWT).
    pub config: Arc<ServerConfig>,
    /// Marketplace business policy, constructed once at startup and
    /// injected here; no component reads the environment directly.
    pub market: Arc<MarketplaceConfig>,
    /// Centralized event bus for publishing market events.
    pub event_bus: Arc<EventBus>,
    /// External transfer processor used by payout runs.
    pub transfer_provider: Arc<dyn TransferProvider>,
}
