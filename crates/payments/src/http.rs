//! HTTP implementation of the transfer provider.
//!
//! Speaks a minimal JSON API: `POST {base_url}/transfers` with a bearer
//! token, returning `{ "id": "..." }`. Any non-success status, malformed
//! body, or timeout becomes a [`TransferError`] with a reason string.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::provider::{TransferError, TransferMetadata, TransferProvider};

/// Default request timeout for transfer calls.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the external transfer processor.
#[derive(Debug, Clone)]
pub struct TransferProviderConfig {
    /// Base URL of the processor API.
    pub base_url: String,
    /// Bearer token for authentication.
    pub api_key: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
}

impl TransferProviderConfig {
    /// Load provider settings from environment variables.
    ///
    /// | Env Var                 | Required | Default |
    /// |-------------------------|----------|---------|
    /// | `TRANSFER_API_URL`      | **yes**  | --      |
    /// | `TRANSFER_API_KEY`      | **yes**  | --      |
    /// | `TRANSFER_TIMEOUT_SECS` | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or malformed.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("TRANSFER_API_URL").expect("TRANSFER_API_URL must be set");
        let api_key =
            std::env::var("TRANSFER_API_KEY").expect("TRANSFER_API_KEY must be set");
        let timeout_secs: u64 = std::env::var("TRANSFER_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("TRANSFER_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }
}

/// Response body for a successful transfer creation.
#[derive(Debug, Deserialize)]
struct TransferResponse {
    id: String,
}

/// Transfer provider backed by an HTTP payment processor.
pub struct HttpTransferProvider {
    client: reqwest::Client,
    config: TransferProviderConfig,
}

impl HttpTransferProvider {
    /// Build a provider with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: TransferProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with static options");
        Self { client, config }
    }
}

#[async_trait]
impl TransferProvider for HttpTransferProvider {
    async fn create_transfer(
        &self,
        destination: &str,
        amount_cents: i64,
        metadata: &TransferMetadata,
    ) -> Result<String, TransferError> {
        let url = format!("{}/transfers", self.config.base_url.trim_end_matches('/'));
        let body = json!({
            "destination": destination,
            "amount_cents": amount_cents,
            "metadata": metadata,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransferError("transfer request timed out".into())
                } else {
                    TransferError(format!("transfer request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(TransferError(format!(
                "transfer rejected with status {status}: {detail}"
            )));
        }

        let parsed: TransferResponse = response
            .json()
            .await
            .map_err(|e| TransferError(format!("malformed transfer response: {e}")))?;

        tracing::debug!(transfer_id = %parsed.id, amount_cents, "Transfer created");
        Ok(parsed.id)
    }
}
