//! Notification fan-out service.
//!
//! [`NotificationFanout`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel and writes a notification row for each recipient of
//! each received [`MarketEvent`]. It runs as a long-lived background task
//! and shuts down when the bus sender is dropped. Failures are logged and
//! swallowed: notification delivery can never affect the transaction that
//! published the event.

use tokio::sync::broadcast;

use leadex_core::money::format_cents;
use leadex_db::repositories::{CompanyRepo, NotificationRepo, ScoutRepo};
use leadex_db::DbPool;

use crate::bus::MarketEvent;

/// One rendered notification: recipient plus human-readable content.
struct Rendered {
    recipient_external_id: String,
    title: String,
    message: String,
}

/// Background service that turns market events into notification rows.
pub struct NotificationFanout;

impl NotificationFanout {
    /// Run the fan-out loop.
    ///
    /// Subscribes to the event bus via the provided `receiver` and writes
    /// notification rows for every event it receives. The loop exits when
    /// the channel is closed.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<MarketEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::fan_out(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            kind = event.kind(),
                            "Failed to write notifications for event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification fan-out lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification fan-out shutting down");
                    break;
                }
            }
        }
    }

    /// Write one notification row per recipient of the event.
    async fn fan_out(pool: &DbPool, event: &MarketEvent) -> Result<(), sqlx::Error> {
        let payload = serde_json::to_value(event).unwrap_or_default();
        for rendered in Self::render(pool, event).await? {
            NotificationRepo::create(
                pool,
                &rendered.recipient_external_id,
                event.kind(),
                &rendered.title,
                &rendered.message,
                &payload,
            )
            .await?;
        }
        Ok(())
    }

    /// Resolve recipients and render the human-readable content for an
    /// event. Events whose entities have vanished render to nothing.
    async fn render(pool: &DbPool, event: &MarketEvent) -> Result<Vec<Rendered>, sqlx::Error> {
        let mut rendered = Vec::new();
        match event {
            MarketEvent::LeadSubmitted { lead_id, scout_id } => {
                if let Some(scout) = ScoutRepo::find_by_id(pool, *scout_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: scout.external_user_id,
                        title: "Lead received".into(),
                        message: format!("Your lead #{lead_id} is now awaiting review."),
                    });
                }
            }
            MarketEvent::LeadModerated {
                lead_id,
                scout_id,
                action,
                reason,
            } => {
                if let Some(scout) = ScoutRepo::find_by_id(pool, *scout_id).await? {
                    let message = match reason {
                        Some(reason) => format!("Lead #{lead_id}: {action}: {reason}"),
                        None => format!("Lead #{lead_id}: {action}"),
                    };
                    rendered.push(Rendered {
                        recipient_external_id: scout.external_user_id,
                        title: "Lead reviewed".into(),
                        message,
                    });
                }
            }
            MarketEvent::LeadSold {
                lead_id,
                scout_id,
                company_id,
                scout_earning_cents,
                ..
            } => {
                if let Some(scout) = ScoutRepo::find_by_id(pool, *scout_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: scout.external_user_id,
                        title: "Lead sold".into(),
                        message: format!(
                            "Your lead #{lead_id} sold. {} added to pending earnings.",
                            format_cents(*scout_earning_cents)
                        ),
                    });
                }
                if let Some(company) = CompanyRepo::find_by_id(pool, *company_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: company.external_user_id,
                        title: "Purchase complete".into(),
                        message: format!("Lead #{lead_id} is yours. Contact details unlocked."),
                    });
                }
            }
            MarketEvent::PayoutCompleted {
                scout_id,
                amount_cents,
                ..
            } => {
                if let Some(scout) = ScoutRepo::find_by_id(pool, *scout_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: scout.external_user_id,
                        title: "Payout sent".into(),
                        message: format!(
                            "{} is on its way to your account.",
                            format_cents(*amount_cents)
                        ),
                    });
                }
            }
            MarketEvent::PayoutFailed {
                scout_id, reason, ..
            } => {
                if let Some(scout) = ScoutRepo::find_by_id(pool, *scout_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: scout.external_user_id,
                        title: "Payout failed".into(),
                        message: format!(
                            "Your payout could not be delivered: {reason}. \
                             Your earnings remain pending and will be retried."
                        ),
                    });
                }
            }
            MarketEvent::CreditsAllocated {
                company_id,
                credits,
            } => {
                if let Some(company) = CompanyRepo::find_by_id(pool, *company_id).await? {
                    rendered.push(Rendered {
                        recipient_external_id: company.external_user_id,
                        title: "Credits renewed".into(),
                        message: format!("{credits} credits were added to your balance."),
                    });
                }
            }
        }
        Ok(rendered)
    }
}
