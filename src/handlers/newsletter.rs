use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::{error::AppError, handlers::MessageResponse, state::AppState};

const CONFIRMATION_TEXT: &str = "Hello from Newsdesk!\n\
    Thank you for subscribing to our newsletter. Stay tuned for updates!\n\
    You will receive weekly updates through the mail.";

#[derive(Debug, Deserialize)]
pub struct SubscribePayload {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailParams {
    email: Option<String>,
}

pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribePayload>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    if !state.store.add_subscriber(&payload.email).await? {
        return Err(AppError::AlreadySubscribed);
    }

    state
        .mailer
        .send(&payload.email, "Subscription Confirmed!", CONFIRMATION_TEXT, None)
        .await?;
    info!("newsletter subscription added");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Subscribed successfully!",
        }),
    ))
}

/// Unsubscribe landing page: asks for confirmation before anything is
/// deleted, so a mail scanner prefetching the link cannot unsubscribe
/// anyone.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<Html<String>, AppError> {
    let email = params
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".into()))?;

    if !state.store.subscriber_exists(&email).await? {
        return Err(AppError::NotFound("Subscriber"));
    }

    Ok(Html(confirmation_page(&email)))
}

pub async fn confirm_unsubscribe(
    State(state): State<AppState>,
    Query(params): Query<EmailParams>,
) -> Result<String, AppError> {
    let email = params
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Email is required".into()))?;

    state.store.remove_subscriber(&email).await?;
    info!("newsletter subscription removed");

    Ok("You have successfully unsubscribed from our newsletter.".to_string())
}

fn confirmation_page(email: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(email.as_bytes()).collect();
    format!(
        r#"<html>
<body style="font-family: Arial; text-align: center; margin-top: 100px;">
  <h2>Are you sure you want to unsubscribe?</h2>
  <button style="background-color: red; color: white; border: none; padding: 10px 20px; font-size: 16px; cursor: pointer; border-radius: 5px;" onclick="confirmUnsubscribe()">Yes, Unsubscribe</button>
  <script>
  function confirmUnsubscribe() {{
    fetch('/api/newsletter/confirm-unsubscribe?email={encoded}')
    .then(res => res.text())
    .then(msg => document.body.innerHTML = '<h3>' + msg + '</h3>')
    .catch(() => alert('Unsubscribe failed. Please try again later.'));
  }}
  </script>
</body>
</html>
"#
    )
}
