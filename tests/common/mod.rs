//! Shared mock-provider infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use heart_oidc::{ClientAssertionClaims, ClientCredentials, ProviderMetadata};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RSA_PRIVATE_PEM: &str = include_str!("../fixtures/rp_signing_key.pem");
pub const RSA_PUBLIC_PEM: &str = include_str!("../fixtures/rp_signing_key.pub.pem");
pub const OP_JWK: &str = include_str!("../fixtures/op_jwk.json");

pub const CLIENT_ID: &str = "test-rp";
pub const AUDIENCE: &str = "https://op.example.org/";
pub const REDIRECT_URI: &str = "https://rp.example.org/redirect";

/// Credentials backed by the RSA fixture key.
pub fn test_credentials() -> Arc<ClientCredentials> {
    Arc::new(
        ClientCredentials::from_rsa_pem(
            CLIENT_ID,
            AUDIENCE,
            REDIRECT_URI,
            RSA_PRIVATE_PEM.as_bytes(),
        )
        .expect("fixture key should parse"),
    )
}

/// A wiremock-backed OpenID Connect provider.
pub struct MockProvider {
    pub server: MockServer,
}

impl MockProvider {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Metadata pointing every endpoint at this mock server.
    pub fn metadata(&self) -> ProviderMetadata {
        let base = self.server.uri();
        ProviderMetadata {
            issuer: base.clone(),
            authorization_endpoint: format!("{base}/authorize"),
            token_endpoint: format!("{base}/token"),
            introspection_endpoint: format!("{base}/introspect"),
            jwks_uri: format!("{base}/jwk"),
            userinfo_endpoint: format!("{base}/userinfo"),
        }
    }

    /// The discovery document advertising [`Self::metadata`].
    pub fn discovery_document(&self) -> Value {
        let m = self.metadata();
        json!({
            "issuer": m.issuer,
            "authorization_endpoint": m.authorization_endpoint,
            "token_endpoint": m.token_endpoint,
            "introspection_endpoint": m.introspection_endpoint,
            "jwks_uri": m.jwks_uri,
            "userinfo_endpoint": m.userinfo_endpoint,
        })
    }

    pub async fn mount_discovery(&self) {
        Mock::given(method("GET"))
            .and(path("/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(self.discovery_document()))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_jwks(&self, keys: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/jwk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "keys": keys })))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_token_response(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mount_introspection(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/introspect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Pull the form body of the only request the named path received.
    pub async fn only_form_request(&self, to_path: &str) -> Vec<(String, String)> {
        let requests = self
            .server
            .received_requests()
            .await
            .expect("request recording enabled");
        let request = requests
            .iter()
            .find(|r| r.url.path() == to_path)
            .unwrap_or_else(|| panic!("no request to {to_path}"));
        url::form_urlencoded::parse(&request.body)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// Decode and verify a captured client assertion against the fixture
/// public key, returning its claims.
pub fn verify_client_assertion(token: &str) -> ClientAssertionClaims {
    let mut validation = Validation::new(Algorithm::RS512);
    validation.set_audience(&[AUDIENCE]);
    jsonwebtoken::decode::<ClientAssertionClaims>(
        token,
        &DecodingKey::from_rsa_pem(RSA_PUBLIC_PEM.as_bytes()).expect("fixture public key"),
        &validation,
    )
    .expect("client assertion should verify")
    .claims
}

/// The fixture JWK as a JSON value.
pub fn op_jwk() -> Value {
    serde_json::from_str(OP_JWK).expect("fixture jwk")
}
