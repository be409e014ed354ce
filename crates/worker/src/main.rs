//! Standalone settlement worker.
//!
//! Runs only the payout schedule and its notification fan-out, for
//! deployments that separate settlement from the API server. Exactly one
//! settlement worker should run per environment; the per-scout
//! open-payout guard makes an accidental overlap safe but noisy.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leadex_api::background;
use leadex_core::config::MarketplaceConfig;
use leadex_events::{EventBus, NotificationFanout};
use leadex_market::PayoutProcessor;
use leadex_payments::{HttpTransferProvider, TransferProviderConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leadex_worker=debug,leadex_market=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let market = MarketplaceConfig::from_env();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = leadex_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    leadex_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    let event_bus = Arc::new(EventBus::default());
    let fanout_handle = tokio::spawn(NotificationFanout::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    let transfer_provider = Arc::new(HttpTransferProvider::new(TransferProviderConfig::from_env()));
    let processor = PayoutProcessor::new(
        pool,
        market.clone(),
        transfer_provider,
        Arc::clone(&event_bus),
    );

    let cancel = tokio_util::sync::CancellationToken::new();
    let schedule_handle = tokio::spawn(background::payout_schedule::run(
        processor,
        market.payout_interval_secs,
        cancel.clone(),
    ));

    tracing::info!("Settlement worker started");

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl-C handler");
    tracing::info!("Shutting down");

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(30), schedule_handle).await;
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), fanout_handle).await;
    tracing::info!("Settlement worker stopped");
}
