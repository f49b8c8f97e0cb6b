//! Client assertion construction and signing.
//!
//! A HEART client authenticates to the authorization server by presenting a
//! short-lived, RS512-signed JWT instead of a shared secret. This module
//! builds the claim set and serializes it to the compact JWT wire form. It
//! is a producer of these assertions, never a verifier: replay rejection of
//! a reused `jti` is the server's job.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Validity window of a client assertion, in seconds.
///
/// The HEART profile pins this to exactly 60 seconds as a deliberate
/// tightening; a verifier is expected to reject assertions outside the
/// window, so clock skew beyond a few seconds causes systematic
/// authentication failure rather than silent acceptance.
pub const ASSERTION_LIFETIME_SECS: i64 = 60;

/// RFC 7523 assertion type sent alongside a signed assertion when it
/// authenticates a token or introspection request.
pub const CLIENT_ASSERTION_TYPE: &str = "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// Length of a generated `jti`, chosen so collision probability over a
/// client's lifetime is negligible.
const JTI_LEN: usize = 50;

/// The claim set of a client assertion.
///
/// `iss` and `sub` are both the client identifier; `aud` is the
/// authorization server's issuer identifier; `exp` is always exactly
/// [`ASSERTION_LIFETIME_SECS`] after `iat`. A claim set is built fresh for
/// every signed request and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAssertionClaims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Source of unique, unpredictable assertion identifiers.
///
/// Abstracted so the hosting process can substitute its own generator
/// without touching the claims-building logic.
pub trait JtiSource: Send + Sync {
    /// Mint a fresh identifier. Each call must return a value that is
    /// unpredictable and distinct from every previous one with
    /// overwhelming probability.
    fn mint(&self) -> String;
}

/// Default [`JtiSource`]: 50 random alphanumeric characters from the
/// thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJti;

impl JtiSource for RandomJti {
    fn mint(&self) -> String {
        rng()
            .sample_iter(Alphanumeric)
            .take(JTI_LEN)
            .map(char::from)
            .collect()
    }
}

/// Builds client assertion claim sets against the current wall clock.
#[derive(Clone)]
pub struct AssertionBuilder {
    jti_source: Arc<dyn JtiSource>,
}

impl Default for AssertionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AssertionBuilder {
    /// Builder using the default [`RandomJti`] source.
    pub fn new() -> Self {
        Self::with_jti_source(Arc::new(RandomJti))
    }

    /// Builder using a caller-supplied entropy source.
    pub fn with_jti_source(jti_source: Arc<dyn JtiSource>) -> Self {
        Self { jti_source }
    }

    /// Produce a fresh claim set: `iss == sub == issuer`, `iat` now,
    /// `exp = iat + 60`, unique `jti`.
    pub fn build(&self, issuer: &str, audience: &str) -> ClientAssertionClaims {
        let iat = Utc::now().timestamp();
        ClientAssertionClaims {
            iss: issuer.to_string(),
            sub: issuer.to_string(),
            aud: audience.to_string(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            jti: self.jti_source.mint(),
        }
    }
}

/// Sign a claim set into the compact JWT wire form
/// (`base64url(header).base64url(payload).base64url(signature)`), RS512.
///
/// No caching, no side effects; the caller supplies a fresh claim set per
/// call.
///
/// # Errors
///
/// Returns [`Error::Signing`](crate::Error::Signing) if the key is not a
/// valid RSA private key or the signing operation fails.
pub fn sign(claims: &ClientAssertionClaims, key: &EncodingKey) -> Result<String> {
    let header = Header::new(Algorithm::RS512);
    Ok(jsonwebtoken::encode(&header, claims, key)?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU64, Ordering};

    use jsonwebtoken::{DecodingKey, Validation};

    use super::*;

    const PRIVATE_PEM: &str = include_str!("../tests/fixtures/rp_signing_key.pem");
    const PUBLIC_PEM: &str = include_str!("../tests/fixtures/rp_signing_key.pub.pem");

    #[test]
    fn assertion_window_is_exactly_sixty_seconds() {
        let claims = AssertionBuilder::new().build("test-rp", "https://op.example.org/");
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn subject_always_equals_issuer() {
        let claims = AssertionBuilder::new().build("test-rp", "https://op.example.org/");
        assert_eq!(claims.sub, claims.iss);
        assert_eq!(claims.iss, "test-rp");
        assert_eq!(claims.aud, "https://op.example.org/");
    }

    #[test]
    fn jti_values_are_pairwise_distinct() {
        let builder = AssertionBuilder::new();
        let jtis: HashSet<String> = (0..1000)
            .map(|_| builder.build("test-rp", "aud").jti)
            .collect();
        assert_eq!(jtis.len(), 1000);
    }

    #[test]
    fn jti_is_fifty_alphanumeric_characters() {
        let jti = RandomJti.mint();
        assert_eq!(jti.len(), 50);
        assert!(jti.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn jti_source_is_injectable() {
        struct Sequential(AtomicU64);
        impl JtiSource for Sequential {
            fn mint(&self) -> String {
                format!("jti-{}", self.0.fetch_add(1, Ordering::Relaxed))
            }
        }

        let builder = AssertionBuilder::with_jti_source(Arc::new(Sequential(AtomicU64::new(0))));
        assert_eq!(builder.build("c", "a").jti, "jti-0");
        assert_eq!(builder.build("c", "a").jti, "jti-1");
    }

    #[test]
    fn sign_round_trips_through_compact_serialization() {
        let claims = AssertionBuilder::new().build("test-rp", "https://op.example.org/");
        let key = EncodingKey::from_rsa_pem(PRIVATE_PEM.as_bytes()).unwrap();

        let token = sign(&claims, &key).expect("signing should succeed");
        assert_eq!(token.split('.').count(), 3);

        let mut validation = Validation::new(Algorithm::RS512);
        validation.set_audience(&["https://op.example.org/"]);
        let decoded = jsonwebtoken::decode::<ClientAssertionClaims>(
            &token,
            &DecodingKey::from_rsa_pem(PUBLIC_PEM.as_bytes()).unwrap(),
            &validation,
        )
        .expect("token should verify against the public key");

        assert_eq!(decoded.header.alg, Algorithm::RS512);
        assert_eq!(decoded.claims, claims);
    }
}
