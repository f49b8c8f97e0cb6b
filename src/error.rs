//! Crate-wide error type.
//!
//! Every failure carries the originating endpoint and, where applicable, the
//! HTTP status and response body, so a caller can diagnose without retrying.
//! None of these conditions resolve themselves: recovery always means the
//! caller regenerating state (a fresh authorization code, a fresh assertion,
//! a fixed configuration).
//!
//! Note that a rejected bearer token is NOT an error. The introspection gate
//! reports rejection through [`Decision`](crate::introspection::Decision) so
//! callers can tell an unauthenticated request apart from a broken
//! introspection subsystem.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by relying-party operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required piece of client or provider configuration is missing
    /// (for example a provider metadata document without a `jwks_uri`).
    /// Fatal to the operation; never retried.
    #[error("missing configuration: {0}")]
    Configuration(String),

    /// The HTTP call itself failed: connection refused, TLS failure, or a
    /// request timeout. Timeouts surface here, not as success.
    #[error("request to {endpoint} failed")]
    Transport {
        /// The endpoint the request was addressed to.
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The provider endpoint answered with a non-success HTTP status.
    /// Status and body are preserved for diagnostics.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Protocol {
        /// The endpoint that produced the response.
        endpoint: String,
        /// HTTP status code of the response.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The response body did not match the expected schema. Treated as a
    /// provider contract violation.
    #[error("failed to decode response from {endpoint}: {reason}")]
    Decode {
        /// The endpoint that produced the response.
        endpoint: String,
        /// What went wrong while decoding.
        reason: String,
    },

    /// Signing a client assertion failed, including the case of a private
    /// key that is structurally invalid for RS512.
    #[error("client assertion signing failed")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl Error {
    pub(crate) fn transport(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            source,
        }
    }

    pub(crate) fn decode(endpoint: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}
