use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{mailer::DeliveryError, news::NewsError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("User already exists")]
    EmailTaken,
    #[error("Already subscribed")]
    AlreadySubscribed,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid or expired token")]
    InvalidResetToken,
    #[error("No age range set for this account")]
    MissingAgeRange,
    #[error("Failed to fetch news")]
    Upstream(#[from] NewsError),
    #[error("Failed to send email")]
    Delivery(#[from] DeliveryError),
    #[error("Database error")]
    Sqlx(#[from] sqlx::Error),
    #[error("Password hashing error")]
    PasswordHash(argon2::password_hash::Error),
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(inner: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(inner)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_)
            | AppError::InvalidResetToken
            | AppError::MissingAgeRange => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_)
            | AppError::SessionExpired
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::EmailTaken | AppError::AlreadySubscribed => StatusCode::CONFLICT,
            AppError::Upstream(e) => {
                tracing::warn!("upstream news failure: {e}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Delivery(e) => {
                tracing::error!("email delivery failure: {e}");
                StatusCode::BAD_GATEWAY
            }
            AppError::Sqlx(e) => {
                // Unique constraint races surface as conflicts, not 500s.
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({"error": "Email already exists"})),
                        )
                            .into_response();
                    }
                }
                tracing::error!("database error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::PasswordHash(e) => {
                tracing::error!("password hashing error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Jwt(e) => {
                tracing::error!("token error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
