use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    auth::{password, session::Session},
    error::AppError,
    models::{Account, NewAccount, PreferencesUpdate},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
    age: Option<String>,
    #[serde(default)]
    preferences: Vec<String>,
    reading_time: Option<String>,
    notifications: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    id: i64,
    name: String,
    email: String,
    age: Option<String>,
    preferences: Vec<String>,
    reading_time: String,
    notifications: bool,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            age: account.age.clone(),
            preferences: account.interests.clone(),
            reading_time: account.reading_time.clone(),
            notifications: account.notifications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    message: &'static str,
    token: String,
    user: AccountView,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    message: &'static str,
    token: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    id: i64,
    name: String,
    email: String,
    preferences: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesView {
    preferences: Vec<String>,
    age: Option<String>,
    reading_time: String,
    notifications: bool,
}

impl From<&Account> for PreferencesView {
    fn from(account: &Account) -> Self {
        Self {
            preferences: account.interests.clone(),
            age: account.age.clone(),
            reading_time: account.reading_time.clone(),
            notifications: account.notifications,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    message: &'static str,
    user: PreferencesUserView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUserView {
    id: i64,
    email: String,
    preferences: Vec<String>,
    age: Option<String>,
    reading_time: String,
    notifications: bool,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupPayload>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    if payload.name.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::Validation(
            "Name, email and password are required".into(),
        ));
    }

    if state.store.account_by_email(&payload.email).await?.is_some() {
        return Err(AppError::EmailTaken);
    }

    let password_hash = password::hash_password(&payload.password)?;
    let account = state
        .store
        .create_account(&NewAccount {
            name: payload.name,
            email: payload.email,
            password_hash,
            age: payload.age,
            interests: payload.preferences,
            reading_time: payload.reading_time,
            notifications: payload.notifications.unwrap_or(false),
        })
        .await?;

    if payload.notifications == Some(true) {
        state.store.add_subscriber(&account.email).await?;
    }

    let token = state.tokens.issue(
        account.id,
        &account.name,
        state.config.signup_token_ttl_secs,
    )?;
    info!(account = account.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            token,
            user: AccountView::from(&account),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = state
        .store
        .account_by_email(&payload.email)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if !password::verify_password(&payload.password, &account.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(
        account.id,
        &account.name,
        state.config.login_token_ttl_secs,
    )?;
    info!(account = account.id, "login successful");

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
    }))
}

pub async fn profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ProfileResponse>, AppError> {
    let account = state
        .store
        .account_by_id(session.account_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(ProfileResponse {
        id: account.id,
        name: account.name,
        email: account.email,
        preferences: account.interests,
    }))
}

pub async fn preferences(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PreferencesView>, AppError> {
    let account = state
        .store
        .account_by_id(session.account_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(PreferencesView::from(&account)))
}

pub async fn update_preferences(
    State(state): State<AppState>,
    session: Session,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<PreferencesResponse>, AppError> {
    let account = state
        .store
        .update_preferences(session.account_id, &update)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    // The subscriber list follows the notifications flag in both directions.
    match update.notifications {
        Some(true) => {
            state.store.add_subscriber(&account.email).await?;
        }
        Some(false) => {
            state.store.remove_subscriber(&account.email).await?;
        }
        None => {}
    }

    Ok(Json(PreferencesResponse {
        message: "User preferences updated successfully",
        user: PreferencesUserView {
            id: account.id,
            email: account.email,
            preferences: account.interests,
            age: account.age,
            reading_time: account.reading_time,
            notifications: account.notifications,
        },
    }))
}
