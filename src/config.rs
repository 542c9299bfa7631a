use std::{env, fmt, str::FromStr};

use tracing::warn;

/// Runtime configuration, read from the environment once at startup.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    /// Lifetime of the token handed out at signup.
    pub signup_token_ttl_secs: i64,
    /// Lifetime of the token handed out at login.
    pub login_token_ttl_secs: i64,
    pub reset_token_ttl_secs: i64,
    pub news_api_url: String,
    pub news_api_key: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from: String,
    /// Where unsubscribe links in outgoing mail point back to.
    pub public_base_url: String,
    /// Frontend page that accepts a `?token=` reset parameter.
    pub reset_link_base: String,
    pub newsletter_interval_secs: u64,
}

impl Config {
    /// Panics when a required variable is missing; a half-configured server
    /// is worse than one that refuses to boot.
    pub fn load() -> Self {
        let smtp_username = required("SMTP_USERNAME");
        let email_from = env::var("EMAIL_FROM").unwrap_or_else(|_| smtp_username.clone());
        Self {
            port: try_load("PORT", 3006),
            database_url: required("DATABASE_URL"),
            jwt_secret: required("JWT_SECRET"),
            signup_token_ttl_secs: try_load("SIGNUP_TOKEN_TTL_SECS", 3_600),
            login_token_ttl_secs: try_load("LOGIN_TOKEN_TTL_SECS", 604_800),
            reset_token_ttl_secs: try_load("RESET_TOKEN_TTL_SECS", 600),
            news_api_url: env::var("NEWS_API_URL")
                .unwrap_or_else(|_| "https://gnews.io/api/v4".to_string()),
            news_api_key: required("NEWS_API_KEY"),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_password: required("SMTP_PASSWORD"),
            smtp_username,
            email_from,
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3006".to_string()),
            reset_link_base: env::var("RESET_LINK_BASE")
                .unwrap_or_else(|_| "http://localhost:5173/reset-password".to_string()),
            newsletter_interval_secs: try_load("NEWSLETTER_INTERVAL_SECS", 604_800),
        }
    }
}

fn required(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}

fn try_load<T: FromStr + fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            panic!("{key} is set but not a valid value: {raw:?}");
        }),
        Err(_) => {
            warn!("{key} not set, defaulting to {default}");
            default
        }
    }
}

// Secrets stay out of debug logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("database_url", &self.database_url)
            .field("jwt_secret", &"***")
            .field("signup_token_ttl_secs", &self.signup_token_ttl_secs)
            .field("login_token_ttl_secs", &self.login_token_ttl_secs)
            .field("reset_token_ttl_secs", &self.reset_token_ttl_secs)
            .field("news_api_url", &self.news_api_url)
            .field("news_api_key", &"***")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"***")
            .field("email_from", &self.email_from)
            .field("public_base_url", &self.public_base_url)
            .field("reset_link_base", &self.reset_link_base)
            .field("newsletter_interval_secs", &self.newsletter_interval_secs)
            .finish()
    }
}
