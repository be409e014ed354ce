//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or an open `Transaction` for the `_in_tx` variants
//! composed into larger atomic units) as the first argument.

pub mod company_repo;
pub mod ledger_repo;
pub mod lead_repo;
pub mod moderation_log_repo;
pub mod notification_repo;
pub mod payout_repo;
pub mod purchase_repo;
pub mod scout_repo;

pub use company_repo::CompanyRepo;
pub use lead_repo::LeadRepo;
pub use ledger_repo::LedgerRepo;
pub use moderation_log_repo::ModerationLogRepo;
pub use notification_repo::NotificationRepo;
pub use payout_repo::PayoutRepo;
pub use purchase_repo::PurchaseRepo;
pub use scout_repo::ScoutRepo;
