//! AdminClient Tests
//!
//! Tests for:
//! - Bearer token injection
//! - Envelope normalization of success and failure bodies
//! - Session invalidation on 401/403 and on local expiry
//! - Status mapping for 404 and 5xx

mod common;

use ca_console::{Error, Role, SessionStore};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_with_store, signed_in, token_expiring_in};

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let (client, _store, token) = signed_in(&server, Role::Admin);

    Mock::given(method("GET"))
        .and(path("/api/admin/platform-fee"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"percent": 12.5}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let value: serde_json::Value = client.get(Role::Admin, "/api/admin/platform-fee").await.unwrap();
    assert_eq!(value["percent"], 12.5);
}

#[tokio::test]
async fn test_expired_token_fails_before_any_request() {
    let server = MockServer::start().await;
    let (client, store) = client_with_store(&server);
    store.set(Role::Admin, &token_expiring_in(-60)).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .get::<serde_json::Value>(Role::Admin, "/api/admin/players")
        .await
        .unwrap_err();

    assert!(err.is_session_error());
    assert_eq!(err.redirect_to(), Some("/login"));
    assert!(store.get(Role::Admin).is_none());
}

#[tokio::test]
async fn test_forbidden_clears_only_that_role() {
    let server = MockServer::start().await;
    let (client, store, _) = signed_in(&server, Role::Affiliate);
    store.set(Role::Admin, &common::live_token()).unwrap();

    Mock::given(method("GET"))
        .and(path("/api/affiliate/referrals"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .get::<serde_json::Value>(Role::Affiliate, "/api/affiliate/referrals")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::SessionExpired { role: Role::Affiliate, redirect_to: "/affiliate/login" }
    ));
    assert!(store.get(Role::Affiliate).is_none());
    assert!(store.get(Role::Admin).is_some());
}

#[tokio::test]
async fn test_field_errors_are_mapped() {
    let server = MockServer::start().await;
    let (client, _store, _) = signed_in(&server, Role::Admin);

    Mock::given(method("POST"))
        .and(path("/api/admin/banners"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "errors": [
                {"param": "title", "msg": "Title already in use"},
                {"msg": "Banner limit reached"}
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .command(reqwest::Method::POST, Role::Admin, "/api/admin/banners", &json!({"title": "x"}))
        .await
        .unwrap_err();

    let errors = err.form_errors().expect("field errors");
    assert_eq!(errors.field("title"), Some("Title already in use"));
    assert_eq!(errors.banner.as_deref(), Some("Banner limit reached"));
}

#[tokio::test]
async fn test_error_string_becomes_banner() {
    let server = MockServer::start().await;
    let (client, _store, _) = signed_in(&server, Role::Admin);

    Mock::given(method("PUT"))
        .and(path("/api/admin/platform-fee"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "success": false,
            "error": "Fee change already scheduled"
        })))
        .mount(&server)
        .await;

    let err = client
        .command(reqwest::Method::PUT, Role::Admin, "/api/admin/platform-fee", &json!({"percent": 3}))
        .await
        .unwrap_err();

    assert_eq!(err.banner(), "Fee change already scheduled");
}

#[tokio::test]
async fn test_not_found_and_server_errors() {
    let server = MockServer::start().await;
    let (client, store, _) = signed_in(&server, Role::Admin);

    Mock::given(method("DELETE"))
        .and(path("/api/admin/banners/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Banner not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/players"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client.delete(Role::Admin, "/api/admin/banners/missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(ref m) if m.contains("Banner not found")));

    let err = client
        .get::<serde_json::Value>(Role::Admin, "/api/admin/players")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Server(_)));

    // Neither failure touches the session
    assert!(store.get(Role::Admin).is_some());
}

#[tokio::test]
async fn test_success_message_is_returned() {
    let server = MockServer::start().await;
    let (client, _store, _) = signed_in(&server, Role::Admin);

    Mock::given(method("DELETE"))
        .and(path("/api/admin/banners/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Banner deleted"
        })))
        .mount(&server)
        .await;

    let message = client.delete(Role::Admin, "/api/admin/banners/b1").await.unwrap();
    assert_eq!(message.as_deref(), Some("Banner deleted"));
}
