//! Relying-party client configuration.

use std::fmt;

use jsonwebtoken::EncodingKey;

use crate::error::Result;

/// Immutable per-client configuration for a HEART relying party.
///
/// `client_id` is the OAuth client identifier and doubles as the issuer
/// (`iss`) and subject (`sub`) of every client assertion this client signs.
/// `audience` is the authorization server's own issuer identifier, the
/// `aud` a compliant server requires on incoming assertions.
///
/// Constructed once by the hosting process and shared read-only across
/// concurrent requests; nothing here mutates after construction.
///
/// # Example
///
/// ```rust,no_run
/// use heart_oidc::ClientCredentials;
///
/// # fn example() -> heart_oidc::Result<()> {
/// let pem = std::fs::read("rp_signing_key.pem").expect("key file");
/// let credentials = ClientCredentials::from_rsa_pem(
///     "my-client-id",
///     "https://op.example.org/",
///     "https://rp.example.org/redirect",
///     &pem,
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClientCredentials {
    /// OAuth client identifier; issuer of this client's assertions.
    pub client_id: String,
    /// Identifier of the authorization server the assertions address.
    pub audience: String,
    /// Redirect URI registered with the provider.
    pub redirect_uri: String,
    /// Private RSA key registered with the provider. Never exposed.
    signing_key: EncodingKey,
}

// Manual Debug impl to keep the private key out of logs.
impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("audience", &self.audience)
            .field("redirect_uri", &self.redirect_uri)
            .field("signing_key", &"[REDACTED]")
            .finish()
    }
}

impl ClientCredentials {
    /// Create credentials from an already-loaded signing key.
    pub fn new(
        client_id: impl Into<String>,
        audience: impl Into<String>,
        redirect_uri: impl Into<String>,
        signing_key: EncodingKey,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            audience: audience.into(),
            redirect_uri: redirect_uri.into(),
            signing_key,
        }
    }

    /// Create credentials from a PKCS#1 or PKCS#8 RSA private key in PEM
    /// form, the shape a hosting process reads from disk at startup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Signing`](crate::Error::Signing) if the PEM is not a
    /// structurally valid RSA private key.
    pub fn from_rsa_pem(
        client_id: impl Into<String>,
        audience: impl Into<String>,
        redirect_uri: impl Into<String>,
        pem: &[u8],
    ) -> Result<Self> {
        let signing_key = EncodingKey::from_rsa_pem(pem)?;
        Ok(Self::new(client_id, audience, redirect_uri, signing_key))
    }

    pub(crate) fn signing_key(&self) -> &EncodingKey {
        &self.signing_key
    }
}
