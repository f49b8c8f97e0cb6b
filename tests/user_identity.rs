//! Integration tests for user identity retrieval.

mod common;

use common::MockProvider;
use heart_oidc::{Error, UserInfoClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn fetch_sends_bearer_token_and_decodes_identity() {
    let provider = MockProvider::start().await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .and(header("authorization", "Bearer access-tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sub": "u-123",
            "name": "Pat Example",
            "preferred_username": "pat",
            "email": "pat@example.org",
            "email_verified": true
        })))
        .mount(&provider.server)
        .await;

    let client = UserInfoClient::new().unwrap();
    let identity = client
        .fetch("access-tok", &provider.metadata())
        .await
        .unwrap();

    assert_eq!(identity.subject, "u-123");
    assert_eq!(identity.name, "Pat Example");
    assert_eq!(identity.preferred_username, "pat");
    assert_eq!(identity.email, "pat@example.org");
    assert!(identity.email_verified);
}

#[tokio::test]
async fn fetch_fails_on_error_status() {
    let unauthorized = MockProvider::start().await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&unauthorized.server)
        .await;

    let client = UserInfoClient::new().unwrap();
    let err = client
        .fetch("stale-tok", &unauthorized.metadata())
        .await
        .unwrap_err();

    match err {
        Error::Protocol { status, body, .. } => {
            assert_eq!(status, 401);
            assert_eq!(body, "expired");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_surfaces_schema_mismatch_as_decode_error() {
    let provider = MockProvider::start().await;
    Mock::given(method("GET"))
        .and(path("/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&provider.server)
        .await;

    let client = UserInfoClient::new().unwrap();
    let err = client
        .fetch("access-tok", &provider.metadata())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}
