//! Token introspection gate (RFC 7662).
//!
//! The request-time authorization decision procedure: given an inbound
//! `Authorization` header, authenticate to the provider's introspection
//! endpoint with a signed client assertion and decide whether to accept the
//! presented bearer token.
//!
//! Rejection is a first-class outcome, not an error. `authorize` returns
//! `Ok(Decision::Rejected(..))` when the request is unauthenticated and
//! `Err(..)` only when the introspection subsystem itself failed (assertion
//! signing, transport, provider contract violations).

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assertion::{self, AssertionBuilder, CLIENT_ASSERTION_TYPE};
use crate::config::ClientCredentials;
use crate::context::RequestContext;
use crate::discovery::ProviderMetadata;
use crate::error::{Error, Result};
use crate::http;

const BEARER_PREFIX: &str = "Bearer ";

/// Introspection endpoint response wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntrospectionResponse {
    /// Whether the token is currently active. The only field a provider is
    /// required to return; everything else defaults when omitted.
    pub active: bool,
    /// Space-delimited scope string.
    #[serde(default)]
    pub scope: String,
    /// Identifier of the user who delegated the token's authority.
    #[serde(default)]
    pub sub: String,
    /// Identifier of the client the token was issued to.
    #[serde(default)]
    pub client_id: String,
}

/// Why an inbound request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No `Authorization` header was presented.
    MissingCredential,
    /// The header carried no `Bearer ` prefix.
    MalformedCredential,
    /// The provider authenticated the token as invalid or expired.
    InactiveToken,
}

impl Rejection {
    /// Human-readable reason, suitable for a forbidden response body.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingCredential => "no Authorization header provided",
            Self::MalformedCredential => "no bearer token in Authorization header",
            Self::InactiveToken => "token is no longer active",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Attributes of an accepted token, extracted for downstream authorization
/// decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Scope tokens the presented token carries, split on whitespace.
    pub scopes: HashSet<String>,
    /// The user who delegated the token's authority.
    pub subject: String,
    /// The client issuing the request.
    pub client_id: String,
}

impl AccessGrant {
    /// Attach the three named attributes to the per-request context. This
    /// is the gate's sole side effect on accept.
    pub fn attach(&self, context: &mut dyn RequestContext) {
        context.set_scopes(&self.scopes);
        context.set_subject(&self.subject);
        context.set_client_id(&self.client_id);
    }
}

/// Outcome of the gate for one inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Token accepted; attributes extracted.
    Granted(AccessGrant),
    /// Request turned away, with the reason.
    Rejected(Rejection),
}

/// Validates inbound bearer tokens against the provider's introspection
/// endpoint, authenticating with signed client assertions.
pub struct IntrospectionGate {
    http: reqwest::Client,
    credentials: Arc<ClientCredentials>,
    assertions: AssertionBuilder,
}

impl IntrospectionGate {
    /// Gate with the crate's default HTTP client (10 s timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(credentials: Arc<ClientCredentials>) -> Result<Self> {
        Ok(Self::with_http_client(credentials, http::default_client()?))
    }

    /// Gate using a caller-supplied HTTP client.
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

    /// Decide whether the request behind `authorization` may proceed.
    ///
    /// Pass the raw `Authorization` header value, or `None` when the request
    /// carried none. On `Decision::Granted`, call
    /// [`AccessGrant::attach`] to expose the attributes to downstream
    /// handlers.
    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        metadata: &ProviderMetadata,
    ) -> Result<Decision> {
        let Some(header) = authorization else {
            debug!("rejecting request without credentials");
            return Ok(Decision::Rejected(Rejection::MissingCredential));
        };

        let Some(token) = header.strip_prefix(BEARER_PREFIX) else {
            debug!("rejecting request with non-bearer Authorization header");
            return Ok(Decision::Rejected(Rejection::MalformedCredential));
        };

        let outcome = self.introspect(token, metadata).await?;
        if !outcome.active {
            debug!("rejecting inactive token");
            return Ok(Decision::Rejected(Rejection::InactiveToken));
        }

        let scopes: HashSet<String> = outcome
            .scope
            .split_whitespace()
            .map(str::to_owned)
            .collect();
        debug!(subject = %outcome.sub, client_id = %outcome.client_id, "token accepted");

        Ok(Decision::Granted(AccessGrant {
            scopes,
            subject: outcome.sub,
            client_id: outcome.client_id,
        }))
    }

    /// Raw introspection call: POST the token with a fresh signed client
    /// assertion as client authentication.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when the metadata carries no introspection
    /// endpoint; transport, protocol, and decode errors as usual.
    pub async fn introspect(
        &self,
        token: &str,
        metadata: &ProviderMetadata,
    ) -> Result<IntrospectionResponse> {
        let endpoint = &metadata.introspection_endpoint;
        if endpoint.is_empty() {
            return Err(Error::Configuration(
                "provider metadata has no introspection_endpoint".to_string(),
            ));
        }

        let claims = self
            .assertions
            .build(&self.credentials.client_id, &self.credentials.audience);
        let client_assertion = assertion::sign(&claims, self.credentials.signing_key())
            .inspect_err(|e| warn!(error = %e, "could not sign introspection client assertion"))?;

        debug!(endpoint = %endpoint, "introspecting bearer token");
        let response = self
            .http
            .post(endpoint)
            .form(&[
                ("token", token),
                ("client_assertion", client_assertion.as_str()),
                ("client_assertion_type", CLIENT_ASSERTION_TYPE),
                ("client_id", self.credentials.client_id.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::transport(endpoint, e))?;

        http::decode_json(response, endpoint).await
    }
}
