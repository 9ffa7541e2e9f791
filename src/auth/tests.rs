//! Tests for the auth module

use super::*;
use crate::error::Error;
use crate::http::{HttpClient, HttpClientConfig};
use crate::types::ErrorPolicy;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

fn creds() -> Credentials {
    Credentials::new("admin", "secret", "System")
}

#[tokio::test]
async fn test_open_session_legacy_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .and(header("Authorization", creds().basic_authorization().as_str()))
        .and(header("Accept", "application/*+xml;version=29.0"))
        .respond_with(ResponseTemplate::new(200).insert_header(LEGACY_TOKEN_HEADER, "legacy-tok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), "29.0".parse().unwrap());
    let ctx = manager.open_session(&creds()).await.unwrap().unwrap();

    assert_eq!(ctx.scheme, TokenScheme::Legacy);
    assert_eq!(ctx.header_name, "x-vcloud-authorization");
    assert_eq!(ctx.header_value, "legacy-tok");
}

#[tokio::test]
async fn test_open_session_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .and(header("Accept", "application/*+xml;version=30.0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(LEGACY_TOKEN_HEADER, "ignored")
                .insert_header(TOKEN_TYPE_HEADER, "Bearer")
                .insert_header(ACCESS_TOKEN_HEADER, "jwt-abc"),
        )
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), "30.0".parse().unwrap());
    let ctx = manager.open_session(&creds()).await.unwrap().unwrap();

    assert_eq!(ctx.scheme, TokenScheme::Bearer);
    assert_eq!(ctx.header_name, "Authorization");
    assert_eq!(ctx.header_value, "Bearer jwt-abc");
}

#[tokio::test]
async fn test_open_session_unexpected_status_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("<Error message=\"denied\"/>"))
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(29, 0));
    let err = manager.open_session(&creds()).await.unwrap_err();

    match err {
        Error::Authentication { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("denied"));
        }
        other => panic!("Expected Authentication, got {other:?}"),
    }
}

#[tokio::test]
async fn test_open_session_fail_soft_returns_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(29, 0))
        .with_login_policy(ErrorPolicy::Report);

    assert!(manager.open_session(&creds()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_open_session_missing_token_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions"))
        .respond_with(ResponseTemplate::new(200).insert_header(TOKEN_TYPE_HEADER, "Bearer"))
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(32, 0));
    let err = manager.open_session(&creds()).await.unwrap_err();

    assert!(matches!(err, Error::Authentication { status: 200, .. }));
    assert!(err.to_string().contains(ACCESS_TOKEN_HEADER));
}

#[tokio::test]
async fn test_close_session_sends_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .and(header("x-vcloud-authorization", "tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(29, 0))
        .with_teardown_policy(ErrorPolicy::Fail);
    let ctx = AuthContext::legacy(ApiVersion::new(29, 0), "tok");

    manager.close_session(&ctx).await.unwrap();
}

#[tokio::test]
async fn test_close_session_failure_is_swallowed_by_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(29, 0));
    let ctx = AuthContext::legacy(ApiVersion::new(29, 0), "expired");

    assert!(manager.close_session(&ctx).await.is_ok());
}

#[tokio::test]
async fn test_close_session_failure_can_be_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/session"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client();
    let manager = SessionManager::new(&client, mock_server.uri(), ApiVersion::new(29, 0))
        .with_teardown_policy(ErrorPolicy::Fail);
    let ctx = AuthContext::legacy(ApiVersion::new(29, 0), "tok");

    let err = manager.close_session(&ctx).await.unwrap_err();
    assert!(matches!(err, Error::Teardown { status: 200, .. }));
}

#[test]
fn test_manager_scheme_follows_version() {
    let client = client();
    let legacy = SessionManager::new(&client, "https://h/", ApiVersion::new(29, 0));
    let bearer = SessionManager::new(&client, "https://h/", ApiVersion::new(30, 0));
    assert_eq!(legacy.scheme(), TokenScheme::Legacy);
    assert_eq!(bearer.scheme(), TokenScheme::Bearer);
}
