use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::{auth::password, error::AppError, handlers::MessageResponse, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RequestResetPayload {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[serde(default)]
    token: String,
    #[serde(default)]
    new_password: String,
}

pub async fn request_reset(
    State(state): State<AppState>,
    Json(payload): Json<RequestResetPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".into()));
    }

    let account = state
        .store
        .account_by_email(&payload.email)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let (token, token_hash) = password::generate_reset_token();
    let expires_at = Utc::now().timestamp() + state.config.reset_token_ttl_secs;
    state
        .store
        .store_reset_token(account.id, &token_hash, expires_at)
        .await?;

    let reset_link = format!("{}?token={}", state.config.reset_link_base, token);
    state
        .mailer
        .send(
            &account.email,
            "Password Reset Request",
            &format!("Click here to reset your password: {reset_link}"),
            None,
        )
        .await?;

    // The plain token only ever exists in the email.
    info!(account = account.id, "password reset link sent");

    Ok(Json(MessageResponse {
        message: "Password reset link sent to email",
    }))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.token.is_empty() || payload.new_password.is_empty() {
        return Err(AppError::Validation(
            "Token and new password are required".into(),
        ));
    }

    let token_hash = password::hash_reset_token(&payload.token);
    let new_password_hash = password::hash_password(&payload.new_password)?;
    let consumed = state
        .store
        .consume_reset_token(&token_hash, &new_password_hash, Utc::now().timestamp())
        .await?;
    if !consumed {
        return Err(AppError::InvalidResetToken);
    }

    Ok(Json(MessageResponse {
        message: "Password reset successfully",
    }))
}
