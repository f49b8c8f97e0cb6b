//! OpenID Connect provider discovery and signing-key retrieval.
//!
//! A relying party resolves a provider once at startup: one GET for the
//! well-known configuration document and one GET for the published key set.
//! The resulting [`Provider`] record is immutable; re-fetching means running
//! discovery again explicitly. There is no automatic refresh or expiry.

use jsonwebtoken::jwk::{Jwk, JwkSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::http;

/// Well-known path of the OpenID Connect discovery document.
pub const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Provider endpoint metadata from the discovery document.
///
/// Fields a provider omits decode as empty strings; operations that need a
/// particular endpoint check for that before making a network call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub introspection_endpoint: String,
    pub jwks_uri: String,
    pub userinfo_endpoint: String,
}

/// A resolved provider: endpoint metadata plus, once fetched, its published
/// signing key.
///
/// The key is consumed by a downstream ID-token verifier, not by this crate;
/// a provider record without a key is usable for every other operation.
#[derive(Debug, Clone)]
pub struct Provider {
    pub metadata: ProviderMetadata,
    pub key: Option<Jwk>,
}

/// Strategy for choosing the provider signing key out of a fetched key set.
pub trait KeySelection: Send + Sync {
    /// Pick the key to use, or `None` if no key in the set is usable.
    fn select<'a>(&self, keys: &'a [Jwk]) -> Option<&'a Jwk>;
}

/// Takes the first key in the set.
///
/// Providers that rotate keys or publish several active keys are not
/// correctly supported by this strategy. That is a known limitation of the
/// HEART reference behavior, kept as a named seam so a kid-aware strategy
/// can replace it without an interface change.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstKey;

impl KeySelection for FirstKey {
    fn select<'a>(&self, keys: &'a [Jwk]) -> Option<&'a Jwk> {
        keys.first()
    }
}

/// Resolves provider metadata and signing keys over HTTP.
pub struct ProviderDirectory {
    http: reqwest::Client,
    key_selection: Box<dyn KeySelection>,
}

impl ProviderDirectory {
    /// Directory with the crate's default HTTP client (10 s timeout).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Ok(Self::with_http_client(http::default_client()?))
    }

    /// Directory using a caller-supplied HTTP client, for custom timeouts
    /// or connection pooling.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            key_selection: Box::new(FirstKey),
        }
    }

    /// Replace the key-selection strategy.
    #[must_use]
    pub fn with_key_selection(mut self, strategy: impl KeySelection + 'static) -> Self {
        self.key_selection = Box::new(strategy);
        self
    }

    /// Fetch and decode the provider's discovery document.
    ///
    /// Appends [`DISCOVERY_PATH`] to the issuer base URL (a trailing slash
    /// on the base is tolerated) and issues a single GET. A non-success
    /// status fails fast with [`Error::Protocol`] before any decode is
    /// attempted. Does not retry.
    pub async fn discover(&self, issuer_base_url: &str) -> Result<ProviderMetadata> {
        let url = format!("{}{}", issuer_base_url.trim_end_matches('/'), DISCOVERY_PATH);
        debug!(url = %url, "fetching provider configuration");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::transport(&url, e))?;
        let metadata: ProviderMetadata = http::decode_json(response, &url).await?;

        info!(issuer = %metadata.issuer, "resolved provider configuration");
        Ok(metadata)
    }

    /// Fetch the provider's key set and select the signing key.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::Configuration`], before any network
    /// I/O, if the metadata carries no `jwks_uri`. An empty or unusable key
    /// set is a [`Error::Decode`] contract violation.
    pub async fn fetch_key(&self, metadata: &ProviderMetadata) -> Result<Jwk> {
        if metadata.jwks_uri.is_empty() {
            return Err(Error::Configuration(
                "provider metadata has no jwks_uri".to_string(),
            ));
        }

        let url = &metadata.jwks_uri;
        debug!(url = %url, "fetching provider key set");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::transport(url, e))?;
        let jwks: JwkSet = http::decode_json(response, url).await?;
        debug!(url = %url, key_count = jwks.keys.len(), "decoded provider key set");

        self.key_selection
            .select(&jwks.keys)
            .cloned()
            .ok_or_else(|| Error::decode(url, "key set contains no usable key"))
    }

    /// Discovery followed by key fetch: the once-at-startup resolution a
    /// hosting process performs.
    pub async fn resolve(&self, issuer_base_url: &str) -> Result<Provider> {
        let metadata = self.discover(issuer_base_url).await?;
        let key = self.fetch_key(&metadata).await?;
        Ok(Provider {
            metadata,
            key: Some(key),
        })
    }
}
