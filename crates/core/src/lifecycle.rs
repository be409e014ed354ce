//! Lead lifecycle state machine.
//!
//! Status values are stored as strings in the `leads` table. The sale
//! status and moderation status advance together:
//!
//! ```text
//! pending_review --approve--------> approved --purchase--> sold
//! pending_review --reject---------> rejected
//! pending_review --request_changes> pending_review (moderation: changes_requested)
//! ```
//!
//! `changes_requested` is tracked in `moderation_status` while the sale
//! status stays `pending_review`; a scout edit resets moderation back to
//! `pending`. `rejected` and `sold` are terminal.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Sale status
// ---------------------------------------------------------------------------

pub const STATUS_PENDING_REVIEW: &str = "pending_review";
pub const STATUS_APPROVED: &str = "approved";
pub const STATUS_REJECTED: &str = "rejected";
pub const STATUS_SOLD: &str = "sold";

// ---------------------------------------------------------------------------
// Moderation status
// ---------------------------------------------------------------------------

pub const MODERATION_PENDING: &str = "pending";
pub const MODERATION_APPROVED: &str = "approved";
pub const MODERATION_CHANGES_REQUESTED: &str = "changes_requested";
pub const MODERATION_REJECTED: &str = "rejected";

// ---------------------------------------------------------------------------
// Moderation actions
// ---------------------------------------------------------------------------

pub const ACTION_APPROVE: &str = "approve";
pub const ACTION_REJECT: &str = "reject";
pub const ACTION_REQUEST_CHANGES: &str = "request_changes";

/// All valid moderation actions.
pub const VALID_ACTIONS: &[&str] = &[ACTION_APPROVE, ACTION_REJECT, ACTION_REQUEST_CHANGES];

/// The `(status, moderation_status)` pair a moderation action moves a
/// lead into. Fails with `Validation` for unknown actions.
pub fn moderation_outcome(action: &str) -> Result<(&'static str, &'static str), CoreError> {
    match action {
        ACTION_APPROVE => Ok((STATUS_APPROVED, MODERATION_APPROVED)),
        ACTION_REJECT => Ok((STATUS_REJECTED, MODERATION_REJECTED)),
        ACTION_REQUEST_CHANGES => Ok((STATUS_PENDING_REVIEW, MODERATION_CHANGES_REQUESTED)),
        other => Err(CoreError::Validation(format!(
            "Invalid moderation action '{other}'. Must be one of: {}",
            VALID_ACTIONS.join(", ")
        ))),
    }
}

/// Only leads awaiting review may be moderated.
pub fn can_moderate(status: &str) -> bool {
    status == STATUS_PENDING_REVIEW
}

/// A lead is editable by its owning scout while awaiting review (including
/// after changes were requested). Approved, rejected, and sold leads are
/// locked.
pub fn is_editable(status: &str) -> bool {
    status == STATUS_PENDING_REVIEW
}

/// A lead is purchasable iff it is approved and not yet bought.
pub fn is_purchasable(status: &str, purchased_by: Option<i64>) -> bool {
    status == STATUS_APPROVED && purchased_by.is_none()
}
