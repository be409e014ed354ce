use crate::types::DbId;

/// Domain error taxonomy shared by every Leadex crate.
///
/// All ledger, lifecycle, and orchestrator errors are raised before any
/// mutation commits, so a caller that receives one of these can assume no
/// partial state was written.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// The operation is not valid in the entity's current state, e.g.
    /// purchasing a lead that is not approved or is already sold.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient credits: required {required}, available {available}")]
    InsufficientCredits { required: i64, available: i64 },

    #[error("Insufficient earnings: requested {requested} cents, available {available} cents")]
    InsufficientEarnings { requested: i64, available: i64 },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An external collaborator (transfer processor) failed. The message is
    /// the opaque reason surfaced by the provider.
    #[error("External service failure: {0}")]
    External(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
