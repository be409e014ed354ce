//! The marketplace transaction and settlement engine.
//!
//! - [`purchase::PurchaseService`] -- the atomic lead purchase: ledger
//!   deduction, lifecycle flip, purchase record, scout accrual, and badge
//!   recomputation in one database transaction.
//! - [`payouts::PayoutProcessor`] -- the scheduled settlement batch that
//!   converts accrued scout earnings into external transfers with
//!   per-scout failure isolation.
//!
//! Both are schedule- and transport-agnostic: the API layer and the
//! worker binary call them directly, and so do the integration tests.

pub mod payouts;
pub mod purchase;

pub use payouts::{PayoutBatchSummary, PayoutProcessor, ScoutOutcome};
pub use purchase::PurchaseService;
