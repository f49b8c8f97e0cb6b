//! User identity retrieval from the provider's user-info endpoint.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::ProviderMetadata;
use crate::error::{Error, Result};
use crate::http;

/// Profile of the authenticated user, as reported by the provider.
///
/// A snapshot taken at fetch time; not kept in sync with the provider.
/// Fields the provider omits decode as defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserIdentity {
    /// Subject identifier, stable per user at this provider.
    #[serde(rename = "sub")]
    pub subject: String,
    /// Display name.
    pub name: String,
    pub preferred_username: String,
    pub email: String,
    pub email_verified: bool,
}

/// Fetches user identity with a bearer access token.
pub struct UserInfoClient {
    http: reqwest::Client,
}

impl UserInfoClient {
    /// Client with the crate's default HTTP client (10 s timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self::with_http_client(http::default_client()?))
    }

    /// Client using a caller-supplied HTTP client.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET the user-info endpoint with `Authorization: Bearer <token>`.
    ///
    /// Single call, no retry, no caching. Fails on transport errors,
    /// non-success statuses, and schema mismatches.
    pub async fn fetch(
        &self,
        access_token: &str,
        metadata: &ProviderMetadata,
    ) -> Result<UserIdentity> {
        let endpoint = &metadata.userinfo_endpoint;
        debug!(endpoint = %endpoint, "fetching user identity");

        let response = self
            .http
            .get(endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        http::decode_json(response, endpoint).await
    }
}
