//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`MarketEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.
//! Events are published strictly after the transaction that produced them
//! commits, so subscribers only ever observe durable state.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use leadex_core::types::DbId;

// ---------------------------------------------------------------------------
// MarketEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the marketplace.
///
/// Each variant carries exactly the payload its notification kind needs;
/// there is no free-form metadata bag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A scout submitted a new lead for review.
    LeadSubmitted { lead_id: DbId, scout_id: DbId },

    /// An admin moderated a lead.
    LeadModerated {
        lead_id: DbId,
        scout_id: DbId,
        action: String,
        reason: Option<String>,
    },

    /// A company bought a lead.
    LeadSold {
        lead_id: DbId,
        scout_id: DbId,
        company_id: DbId,
        sale_price_cents: i64,
        scout_earning_cents: i64,
    },

    /// A settlement transfer reached the scout's account.
    PayoutCompleted {
        payout_id: DbId,
        scout_id: DbId,
        amount_cents: i64,
    },

    /// A settlement transfer failed; earnings remain pending.
    PayoutFailed {
        payout_id: DbId,
        scout_id: DbId,
        amount_cents: i64,
        reason: String,
    },

    /// A subscription renewal credited a company's balance.
    CreditsAllocated { company_id: DbId, credits: i64 },
}

impl MarketEvent {
    /// Stable kind name, stored on the notification rows this event
    /// produces.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketEvent::LeadSubmitted { .. } => "lead.submitted",
            MarketEvent::LeadModerated { .. } => "lead.moderated",
            MarketEvent::LeadSold { .. } => "lead.sold",
            MarketEvent::PayoutCompleted { .. } => "payout.completed",
            MarketEvent::PayoutFailed { .. } => "payout.failed",
            MarketEvent::CreditsAllocated { .. } => "credits.allocated",
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`MarketEvent`].
pub struct EventBus {
    sender: broadcast::Sender<MarketEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// notification delivery is best-effort by design.
    pub fn publish(&self, event: MarketEvent) {
        // The SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(MarketEvent::LeadSold {
            lead_id: 42,
            scout_id: 7,
            company_id: 3,
            sale_price_cents: 3000,
            scout_earning_cents: 1500,
        });

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.kind(), "lead.sold");
        match received {
            MarketEvent::LeadSold {
                lead_id,
                scout_earning_cents,
                ..
            } => {
                assert_eq!(lead_id, 42);
                assert_eq!(scout_earning_cents, 1500);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(MarketEvent::CreditsAllocated {
            company_id: 1,
            credits: 50,
        });

        assert_eq!(rx1.recv().await.unwrap().kind(), "credits.allocated");
        assert_eq!(rx2.recv().await.unwrap().kind(), "credits.allocated");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(MarketEvent::LeadSubmitted {
            lead_id: 1,
            scout_id: 1,
        });
    }

    #[test]
    fn events_serialize_with_a_type_tag() {
        let event = MarketEvent::PayoutFailed {
            payout_id: 5,
            scout_id: 9,
            amount_cents: 2500,
            reason: "destination account closed".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "payout_failed");
        assert_eq!(json["amount_cents"], 2500);
    }
}
