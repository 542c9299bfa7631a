//! Account flows over the HTTP surface: signup, login, profile, and the
//! token failure modes. Each test builds its own router against a fresh
//! in-memory database.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use newsdesk::rest;
use serde_json::json;

use common::{send_json, signup, test_state};

#[tokio::test]
async fn signup_returns_token_and_account() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter2",
            "age": "18-24",
            "preferences": ["technology"],
            "notifications": false,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["age"], "18-24");
    assert_eq!(body["user"]["preferences"], json!(["technology"]));
    assert_eq!(body["user"]["readingTime"], "Any");
    assert_eq!(body["user"]["notifications"], false);

    // The token is immediately usable and belongs to the new account.
    let claims = state
        .tokens
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(claims.sub, body["user"]["id"].as_i64().unwrap().to_string());
    assert_eq!(claims.name, "Ada");
}

#[tokio::test]
async fn signup_requires_name_email_and_password() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state);

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({ "name": "Ada", "email": "ada@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, email and password are required");
}

#[tokio::test]
async fn duplicate_signup_is_a_conflict() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state);

    signup(&router, "ada@example.com", "hunter2").await;
    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({
            "name": "Ada Again",
            "email": "ada@example.com",
            "password": "different",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
}

#[tokio::test]
async fn signup_with_notifications_joins_the_newsletter() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    let (status, _body) = send_json(
        &router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter2",
            "notifications": true,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(state
        .store
        .subscriber_exists("ada@example.com")
        .await
        .unwrap());
}

#[tokio::test]
async fn login_roundtrip() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    let created = signup(&router, "ada@example.com", "hunter2").await;
    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "hunter2" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let claims = state
        .tokens
        .verify(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(
        claims.sub,
        created["user"]["id"].as_i64().unwrap().to_string()
    );
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state);

    signup(&router, "ada@example.com", "hunter2").await;
    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid email or password");
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state);

    let (status, body) = send_json(
        &router,
        Method::POST,
        "/api/user/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "hunter2" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn profile_without_token_is_unauthorized() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state);

    let (status, body) =
        send_json(&router, Method::GET, "/api/user/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Access denied. No token provided.");
}

#[tokio::test]
async fn profile_with_tampered_token_is_forbidden() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    let body = signup(&router, "ada@example.com", "hunter2").await;
    let mut token = body["token"].as_str().unwrap().to_string();
    token.pop();

    let (status, body) =
        send_json(&router, Method::GET, "/api/user/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn profile_with_expired_token_asks_for_a_new_login() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    // Issued two hours ago with a one hour lifetime.
    let stale = state
        .tokens
        .issue_at(1, "Ghost", 3_600, Utc::now() - Duration::hours(2))
        .unwrap();

    let (status, body) =
        send_json(&router, Method::GET, "/api/user/profile", Some(&stale), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Session expired. Please log in again.");
}

#[tokio::test]
async fn profile_returns_the_signed_in_account() {
    let (state, _mailer) = test_state().await;
    let router = rest::router(state.clone());

    let (status, created) = send_json(
        &router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "hunter2",
            "preferences": ["science", "technology"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let token = created["token"].as_str().unwrap();

    let (status, profile) =
        send_json(&router, Method::GET, "/api/user/profile", Some(token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Ada");
    assert_eq!(profile["email"], "ada@example.com");
    assert_eq!(profile["preferences"], json!(["science", "technology"]));
}
