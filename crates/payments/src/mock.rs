//! In-memory transfer provider for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::provider::{TransferError, TransferMetadata, TransferProvider};

/// A transfer call recorded by the mock.
#[derive(Debug, Clone)]
pub struct RecordedTransfer {
    pub destination: String,
    pub amount_cents: i64,
    pub payout_id: i64,
    pub scout_id: i64,
}

/// Scriptable transfer provider: succeeds with generated ids by default,
/// and can be told to fail for specific destinations. Records every call
/// for assertions.
#[derive(Default)]
pub struct MockTransferProvider {
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<RecordedTransfer>>,
    counter: AtomicU64,
}

impl MockTransferProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a failure for every transfer to `destination`.
    pub fn fail_for(&self, destination: &str, reason: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(destination.to_string(), reason.to_string());
    }

    /// Clear a previously scripted failure.
    pub fn succeed_for(&self, destination: &str) {
        self.failures.lock().unwrap().remove(destination);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<RecordedTransfer> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransferProvider for MockTransferProvider {
    async fn create_transfer(
        &self,
        destination: &str,
        amount_cents: i64,
        metadata: &TransferMetadata,
    ) -> Result<String, TransferError> {
        self.calls.lock().unwrap().push(RecordedTransfer {
            destination: destination.to_string(),
            amount_cents,
            payout_id: metadata.payout_id,
            scout_id: metadata.scout_id,
        });

        if let Some(reason) = self.failures.lock().unwrap().get(destination) {
            return Err(TransferError(reason.clone()));
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(format!("mock-transfer-{n}"))
    }
}
