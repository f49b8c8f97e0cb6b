//! Authorization-code flow: redirect URL construction and code exchange.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use tracing::{debug, info};
use url::form_urlencoded;

use crate::assertion::{self, AssertionBuilder, CLIENT_ASSERTION_TYPE};
use crate::config::ClientCredentials;
use crate::discovery::ProviderMetadata;
use crate::error::{Error, Result};
use crate::http;

/// Scopes requested on every authorization redirect.
pub const AUTHORIZATION_SCOPE: &str = "openid profile email";

/// Starts end-user authentication and exchanges the resulting authorization
/// code for tokens, authenticating with a signed client assertion.
pub struct AuthorizationFlow {
    http: reqwest::Client,
    credentials: Arc<ClientCredentials>,
    assertions: AssertionBuilder,
}

impl AuthorizationFlow {
    /// Flow with the crate's default HTTP client (10 s timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Arc<ClientCredentials>) -> Result<Self> {
        Ok(Self::with_http_client(credentials, http::default_client()?))
    }

    /// Flow using a caller-supplied HTTP client.
    pub fn with_http_client(credentials: Arc<ClientCredentials>, http: reqwest::Client) -> Self {
        Self {
            http,
            credentials,
            assertions: AssertionBuilder::new(),
        }
    }

    /// Replace the assertion builder (to inject a custom jti source).
    #[must_use]
    pub fn with_assertion_builder(mut self, assertions: AssertionBuilder) -> Self {
        self.assertions = assertions;
        self
    }

    /// Build the URL that redirects an end user to the provider to
    /// authenticate.
    ///
    /// Pure function of its inputs; no network call. `state` is opaque here:
    /// the caller mints it and must validate it on return, this crate does
    /// not.
    pub fn authorization_url(&self, metadata: &ProviderMetadata, state: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("state", state)
            .append_pair("response_type", "code")
            .append_pair("redirect_uri", &self.credentials.redirect_uri)
            .append_pair("scope", AUTHORIZATION_SCOPE)
            .finish();
        format!("{}?{}", metadata.authorization_endpoint, query)
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Builds and signs a fresh client assertion, then POSTs the
    /// `authorization_code` grant to the provider's token endpoint. A
    /// non-success response surfaces as [`Error::Protocol`] with the status
    /// and body; it is never retried, since authorization codes are
    /// single-use and a retry would fail regardless.
    pub async fn exchange_code(&self, code: &str, metadata: &ProviderMetadata) -> Result<TokenSet> {
        let claims = self
            .assertions
            .build(&self.credentials.client_id, &self.credentials.audience);
        let client_assertion = assertion::sign(&claims, self.credentials.signing_key())?;

        let endpoint = &metadata.token_endpoint;
        debug!(endpoint = %endpoint, "exchanging authorization code");

        let response = self
            .http
            .post(endpoint)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("client_assertion", client_assertion.as_str()),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_id", self.credentials.client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        let wire: TokenResponse = http::decode_json(response, endpoint).await?;
        let tokens = TokenSet::from_wire(wire);
        info!(token_type = %tokens.token_type, expires_at = %tokens.expires_at, "authorization code exchanged");
        Ok(tokens)
    }
}

/// Token endpoint response wire format.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: i64,
    #[serde(default)]
    id_token: String,
}

/// Tokens obtained from a successful code exchange.
///
/// `expires_at` is absolute, computed once when the response is decoded
/// (`now + expires_in`); it is never recomputed later. Ownership transfers
/// to the caller; this crate does not cache tokens or track their
/// lifecycle.
#[derive(Clone)]
pub struct TokenSet {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub id_token: String,
}

impl TokenSet {
    fn from_wire(wire: TokenResponse) -> Self {
        Self {
            access_token: wire.access_token,
            token_type: wire.token_type,
            refresh_token: wire.refresh_token,
            expires_at: Utc::now() + TimeDelta::seconds(wire.expires_in),
            id_token: wire.id_token,
        }
    }
}

// Manual Debug impl to keep token material out of logs.
impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .field("id_token", &"[REDACTED]")
            .finish()
    }
}
