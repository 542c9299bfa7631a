use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A registered user row. `interests` is stored as a JSON text column and
/// decoded by the store, so this struct is assembled there rather than
/// derived with `FromRow`.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<String>,
    pub interests: Vec<String>,
    pub reading_time: String,
    pub notifications: bool,
    pub reset_token_hash: Option<String>,
    pub reset_expires_at: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Input for account creation. The password is already hashed by the time
/// it reaches the store.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub age: Option<String>,
    pub interests: Vec<String>,
    pub reading_time: Option<String>,
    pub notifications: bool,
}

/// Partial preference update. `None` means "leave unchanged"; only fields
/// present in the request body are applied. On the wire the interest list
/// goes by `preferences`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    #[serde(rename = "preferences")]
    pub interests: Option<Vec<String>>,
    pub age: Option<String>,
    pub reading_time: Option<String>,
    pub notifications: Option<bool>,
}

/// One liked or saved article. `article_id` is unique within its list for a
/// given account.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub article_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// A newsletter recipient. Keyed by email only; independent of any account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    pub subscribed_at: NaiveDateTime,
}
