//! # heart-oidc: HEART-profile OpenID Connect relying party
//!
//! Client side of the HEART profile for OAuth 2.0 / OpenID Connect: a
//! relying party that authenticates to an authorization server with
//! RS512-signed JWT client assertions instead of a shared secret, exchanges
//! authorization codes for tokens, retrieves user identity, and validates
//! inbound bearer tokens via introspection.
//!
//! ## Architecture
//!
//! - [`assertion`]: client assertion claims and RS512 compact-JWT signing
//! - [`config`]: immutable per-client credentials
//! - [`discovery`]: provider discovery document and JWKS retrieval
//! - [`flow`]: authorization redirect URL and authorization-code exchange
//! - [`userinfo`]: user identity retrieval
//! - [`introspection`]: the request-time bearer-token decision procedure
//! - [`context`]: the per-request attribute sink the hosting framework
//!   implements
//! - [`error`]: crate-wide error type
//!
//! A hosting process resolves a provider once at startup, then shares the
//! read-only [`Provider`] record and [`ClientCredentials`] across
//! concurrently handled requests. The crate holds no mutable state of its
//! own; every outbound call is bounded by an explicit timeout and nothing is
//! ever retried; codes are single-use and assertions are time-boxed, so the
//! cure for a failure is fresh state, not repetition.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use heart_oidc::{
//!     AuthorizationFlow, ClientCredentials, Decision, IntrospectionGate, ProviderDirectory,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> heart_oidc::Result<()> {
//! let pem = std::fs::read("rp_signing_key.pem").expect("key file");
//! let credentials = Arc::new(ClientCredentials::from_rsa_pem(
//!     "my-client-id",
//!     "https://op.example.org/",
//!     "https://rp.example.org/redirect",
//!     &pem,
//! )?);
//!
//! // Once at startup: discovery plus key fetch.
//! let directory = ProviderDirectory::new()?;
//! let provider = directory.resolve("https://op.example.org").await?;
//!
//! // Per end-user login: redirect, then exchange the returned code.
//! let flow = AuthorizationFlow::new(Arc::clone(&credentials))?;
//! let redirect = flow.authorization_url(&provider.metadata, "opaque-state");
//! let tokens = flow.exchange_code("auth-code", &provider.metadata).await?;
//!
//! // Per protected-resource request: introspect the presented token.
//! let gate = IntrospectionGate::new(credentials)?;
//! match gate.authorize(Some("Bearer tok"), &provider.metadata).await? {
//!     Decision::Granted(grant) => println!("subject {}", grant.subject),
//!     Decision::Rejected(why) => println!("forbidden: {why}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Standards
//!
//! - HEART Profile for OAuth 2.0 / OpenID Connect
//! - RFC 7519 (JWT), RFC 7523 (JWT client authentication)
//! - RFC 7662 (token introspection)
//! - OpenID Connect Discovery 1.0

pub mod assertion;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod flow;
pub mod introspection;
pub mod userinfo;

mod http;

#[doc(inline)]
pub use assertion::{
    ASSERTION_LIFETIME_SECS, AssertionBuilder, CLIENT_ASSERTION_TYPE, ClientAssertionClaims,
    JtiSource, RandomJti,
};
#[doc(inline)]
pub use config::ClientCredentials;
#[doc(inline)]
pub use context::{MapContext, RequestContext};
#[doc(inline)]
pub use discovery::{
    DISCOVERY_PATH, FirstKey, KeySelection, Provider, ProviderDirectory, ProviderMetadata,
};
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use flow::{AUTHORIZATION_SCOPE, AuthorizationFlow, TokenSet};
#[doc(inline)]
pub use introspection::{
    AccessGrant, Decision, IntrospectionGate, IntrospectionResponse, Rejection,
};
#[doc(inline)]
pub use userinfo::{UserIdentity, UserInfoClient};
