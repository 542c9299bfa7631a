//! Shared helpers for the integration tests: in-memory application state,
//! a recording mailer double, and small HTTP utilities.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::util::ServiceExt;

use newsdesk::{
    auth::token::TokenService,
    config::Config,
    mailer::{DeliveryError, Mailer},
    news::NewsClient,
    state::AppState,
    store::Store,
};

#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

/// Records every message instead of talking SMTP. Recipients listed in
/// `fail_recipients` get a delivery error instead.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<SentMail>>,
    pub fail_recipients: Vec<String>,
}

impl RecordingMailer {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_recipients: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub async fn messages(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        text: &str,
        html: Option<&str>,
    ) -> Result<(), DeliveryError> {
        if self.fail_recipients.iter().any(|r| r == to) {
            // Manufacture a real error without any network involvement.
            let err = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(DeliveryError::Address(err));
        }
        self.sent.lock().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
            html: html.map(str::to_string),
        });
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: "sqlite::memory:".into(),
        jwt_secret: "integration-test-secret".into(),
        signup_token_ttl_secs: 3_600,
        login_token_ttl_secs: 604_800,
        reset_token_ttl_secs: 600,
        news_api_url: "http://127.0.0.1:9".into(),
        news_api_key: "test-key".into(),
        smtp_host: "localhost".into(),
        smtp_username: "tests@example.com".into(),
        smtp_password: "unused".into(),
        email_from: "tests@example.com".into(),
        public_base_url: "http://localhost:3006".into(),
        reset_link_base: "http://localhost:5173/reset-password".into(),
        newsletter_interval_secs: 604_800,
    }
}

/// Fresh state against the given news base URL. Each call gets its own
/// in-memory database.
pub async fn state_with(news_base: &str, mailer: Arc<RecordingMailer>) -> AppState {
    let store = Store::open("sqlite::memory:")
        .await
        .expect("in-memory store");
    AppState {
        store,
        tokens: TokenService::new("integration-test-secret"),
        mailer,
        news: NewsClient::new(news_base, "test-key"),
        config: Arc::new(test_config()),
    }
}

/// State whose news client points at a closed port, for tests that never
/// reach the upstream or that exercise the degraded path.
pub async fn test_state() -> (AppState, Arc<RecordingMailer>) {
    let mailer = Arc::new(RecordingMailer::default());
    let state = state_with("http://127.0.0.1:9", mailer.clone()).await;
    (state, mailer)
}

/// Fire one request and return `(status, parsed body)`. Non-JSON bodies
/// come back as a JSON string value.
pub async fn send_json(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

/// Create an account and return the signup response body.
pub async fn signup(router: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send_json(
        router,
        Method::POST,
        "/api/user/signup",
        None,
        Some(json!({
            "name": "Test Reader",
            "email": email,
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body
}
