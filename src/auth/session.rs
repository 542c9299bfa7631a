use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, state::AppState};

/// Verified identity behind a `Bearer` token. Extracting this in a handler
/// signature is what makes a route protected.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: i64,
    pub account_name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized("Access denied. No token provided."))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized("Access denied. No token provided."))?;

        let claims = state.tokens.verify(token)?;
        let account_id = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;
        Ok(Session {
            account_id,
            account_name: claims.name,
        })
    }
}
