//! End-to-end tests for the Axum HTTP API over an in-memory `SQLite` store.
//!
//! Run with: `cargo test --test e2e_axum`

#![cfg(all(feature = "axum_api", feature = "sqlx_sqlite"))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{RecordingNotifier, dispatcher, hasher, setup_store, signer};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tenantry::api::axum::{AppState, router};
use tower::ServiceExt;

async fn create_app() -> (Router, RecordingNotifier) {
    let (store, _) = setup_store().await;
    let (dispatcher, notifier) = dispatcher();
    let state = AppState::new(store, signer(), dispatcher).with_hasher(hasher());
    (router(state), notifier)
}

async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn registration(email: &str, organization_name: &str) -> Value {
    json!({
        "name": "Jane",
        "email": email,
        "password": "pw123456",
        "organization_name": organization_name,
    })
}

async fn register_and_login(app: &Router) -> Value {
    let (status, _) = send(app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Acme Corp"))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "jane@x.com", "password": "pw123456"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_probes() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&app, "GET", "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_returns_views_without_secrets() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Acme Corp"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["organization"]["slug"], "acme-corp");
    assert_eq!(body["user"]["email"], "jane@x.com");
    assert_eq!(body["user"]["email_verified"], false);
    assert!(body["user"].get("password_hash").is_none());
    assert!(body["user"].get("verification_token").is_none());
}

#[tokio::test]
async fn test_register_conflicts_and_validation() {
    let (app, _) = create_app().await;
    send(&app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Acme"))).await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Other"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EMAIL_CONFLICT");

    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(registration("max@x.com", "Acme"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SLUG_CONFLICT");

    let (status, body) = send(&app, "POST", "/api/v1/auth/register", None, Some(registration("not-an-email", "Globex"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_and_current_user() {
    let (app, _) = create_app().await;
    let login = register_and_login(&app).await;

    assert_eq!(login["token_type"], "Bearer");
    assert_eq!(login["expires_in"], 3600);
    let token = login["access_token"].as_str().unwrap();
    assert!(!login["refresh_token"].as_str().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/api/v1/users/current", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@x.com");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_look_the_same() {
    let (app, _) = create_app().await;
    register_and_login(&app).await;

    let wrong_password = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "jane@x.com", "password": "wrong-password"})),
    )
    .await;
    let unknown_email = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "ghost@x.com", "password": "wrong-password"})),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_malformed_bodies_use_error_envelope() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/login", None, Some(json!({"email": "jane@x.com"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Invalid request body");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(json!({"name": 7, "email": "jane@x.com", "password": "pw123456", "organization_name": "Acme"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(!body["error"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_protected_routes_require_bearer_token() {
    let (app, _) = create_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/users/current", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHENTICATED");

    let (status, _) = send(&app, "GET", "/api/v1/organizations/current", Some("not.a.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_then_logout() {
    let (app, _) = create_app().await;
    let login = register_and_login(&app).await;
    let access = login["access_token"].as_str().unwrap();
    let refresh = json!({"refresh_token": login["refresh_token"]});

    let (status, body) = send(&app, "POST", "/api/v1/auth/refresh", None, Some(refresh.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].as_str().is_some());

    let (status, body) = send(&app, "DELETE", "/api/v1/auth/logout", Some(access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully logged out");

    let (status, body) = send(&app, "POST", "/api/v1/auth/refresh", None, Some(refresh)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_email_verification_flow() {
    let (app, notifier) = create_app().await;
    send(&app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Acme"))).await;
    let token = notifier.token_for("jane@x.com", 1).await;

    let (status, body) = send(&app, "POST", "/api/v1/auth/verify-email", None, Some(json!({"token": token}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email verified successfully");

    let (status, body) = send(&app, "POST", "/api/v1/auth/verify-email", None, Some(json!({"token": token}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_VERIFICATION_TOKEN");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/resend-verification",
        None,
        Some(json!({"email": "jane@x.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email already verified");
}

#[tokio::test]
async fn test_resend_message_is_uniform() {
    let (app, _) = create_app().await;
    send(&app, "POST", "/api/v1/auth/register", None, Some(registration("jane@x.com", "Acme"))).await;

    let known = send(&app, "POST", "/api/v1/auth/resend-verification", None, Some(json!({"email": "jane@x.com"}))).await;
    let unknown = send(&app, "POST", "/api/v1/auth/resend-verification", None, Some(json!({"email": "ghost@x.com"}))).await;

    assert_eq!(known.0, StatusCode::OK);
    assert_eq!(known, unknown);
}

#[tokio::test]
async fn test_organization_routes() {
    let (app, _) = create_app().await;
    let login = register_and_login(&app).await;
    let token = login["access_token"].as_str().unwrap();
    let owner_id = login["user"]["id"].as_str().unwrap().to_owned();

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/organizations/current",
        Some(token),
        Some(json!({"name": "Acme Industries"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acme Industries");
    assert_eq!(body["slug"], "acme-corp");

    let (status, body) = send(&app, "GET", "/api/v1/organizations/members", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["role"], "owner");

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/organizations/members/{owner_id}"),
        Some(token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = send(&app, "DELETE", "/api/v1/organizations/members/nobody", Some(token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subscription_routes() {
    let (app, _) = create_app().await;
    let login = register_and_login(&app).await;
    let token = login["access_token"].as_str().unwrap();

    let (status, body) = send(&app, "GET", "/api/v1/subscriptions/current", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["slug"], "free");
    assert_eq!(body["status"], "active");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/subscriptions/upgrade",
        Some(token),
        Some(json!({"plan_id": "550e8400-e29b-41d4-a716-446655440003"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["slug"], "enterprise");

    let (status, _) = send(&app, "POST", "/api/v1/subscriptions/cancel", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/subscriptions/current", Some(token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_current_user() {
    let (app, _) = create_app().await;
    let login = register_and_login(&app).await;
    let token = login["access_token"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PATCH",
        "/api/v1/users/current",
        Some(token),
        Some(json!({"name": "Jane Doe", "password": "another-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Jane Doe");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "jane@x.com", "password": "another-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
