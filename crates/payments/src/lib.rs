//! External payment-transfer capability.
//!
//! The settlement engine consumes transfers through the
//! [`TransferProvider`] trait: `create_transfer(destination, amount,
//! metadata)` returns an external transfer id or an opaque error that is
//! recorded on the payout row. Two implementations are provided:
//! [`HttpTransferProvider`] for a real processor and
//! [`MockTransferProvider`] for tests.

pub mod http;
pub mod mock;
pub mod provider;

pub use http::{HttpTransferProvider, TransferProviderConfig};
pub use mock::MockTransferProvider;
pub use provider::{TransferError, TransferMetadata, TransferProvider};
