//! Leadex event bus and notification infrastructure.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`MarketEvent`] -- the typed domain event, one variant per
//!   notification kind, each carrying its own strongly-typed payload.
//! - [`notifier`] -- background task that fans events out into
//!   notification rows; its failures are logged and swallowed, never
//!   surfaced to the publishing transaction.

pub mod bus;
pub mod notifier;

pub use bus::{EventBus, MarketEvent};
pub use notifier::NotificationFanout;
