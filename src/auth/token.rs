//! Session tokens (JWT, HS256).
//!
//! Expiry is validated against a caller-supplied clock instead of the
//! library's system-time check, so expired-session behavior is testable
//! and there is no hidden leeway window.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, stringified.
    pub sub: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(&self, account_id: i64, name: &str, ttl_secs: i64) -> Result<String, AppError> {
        self.issue_at(account_id, name, ttl_secs, Utc::now())
    }

    pub fn issue_at(
        &self,
        account_id: i64,
        name: &str,
        ttl_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: account_id.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_secs,
        };
        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Expired sessions and structurally bad tokens are distinct failures:
    /// the first asks the caller to log in again, the second is rejected
    /// outright.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AppError::InvalidToken)?;
        if data.claims.exp <= now.timestamp() {
            return Err(AppError::SessionExpired);
        }
        Ok(data.claims)
    }
}
