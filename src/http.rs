//! Shared HTTP plumbing for provider endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, Result};

/// Request timeout applied to the default client. A hung authorization
/// server must not hang the relying party; callers needing a different
/// bound inject their own pre-built `reqwest::Client`.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the crate's default HTTP client.
pub(crate) fn default_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Decode a provider response, failing fast on non-success statuses.
///
/// A non-success status yields [`Error::Protocol`] with the status and body
/// preserved; no decode of an error body is ever attempted.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    endpoint: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(endpoint = %endpoint, status = status.as_u16(), "provider endpoint returned error status");
        return Err(Error::Protocol {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| Error::transport(endpoint, e))?;
    serde_json::from_slice(&body).map_err(|e| Error::decode(endpoint, e))
}
