use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    auth::session::Session,
    error::AppError,
    handlers::MessageResponse,
    models::ArticleRecord,
    state::AppState,
    store::InteractionKind,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionPayload {
    #[serde(default)]
    article_id: String,
    #[serde(default)]
    title: String,
    image_url: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovePayload {
    #[serde(default)]
    article_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    message: &'static str,
    liked_articles: Vec<ArticleRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveToggleResponse {
    message: &'static str,
    saved_articles: Vec<ArticleRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    liked_articles: Vec<String>,
    saved_articles: Vec<String>,
}

fn into_record(payload: InteractionPayload) -> Result<ArticleRecord, AppError> {
    if payload.article_id.is_empty() {
        return Err(AppError::Validation("Article ID is required".into()));
    }
    Ok(ArticleRecord {
        article_id: payload.article_id,
        title: payload.title,
        image_url: payload.image_url,
        description: payload.description,
    })
}

pub async fn toggle_like(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<InteractionPayload>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    let record = into_record(payload)?;
    let liked_articles = state
        .store
        .toggle_interaction(InteractionKind::Liked, session.account_id, &record)
        .await?;
    Ok(Json(LikeToggleResponse {
        message: "Like status updated successfully.",
        liked_articles,
    }))
}

pub async fn toggle_save(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<InteractionPayload>,
) -> Result<Json<SaveToggleResponse>, AppError> {
    let record = into_record(payload)?;
    let saved_articles = state
        .store
        .toggle_interaction(InteractionKind::Saved, session.account_id, &record)
        .await?;
    Ok(Json(SaveToggleResponse {
        message: "Save status updated successfully.",
        saved_articles,
    }))
}

pub async fn unlike(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RemovePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.article_id.is_empty() {
        return Err(AppError::Validation("Article ID is required".into()));
    }
    state
        .store
        .remove_interaction(InteractionKind::Liked, session.account_id, &payload.article_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Article unliked successfully.",
    }))
}

pub async fn unsave(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RemovePayload>,
) -> Result<Json<MessageResponse>, AppError> {
    if payload.article_id.is_empty() {
        return Err(AppError::Validation("Article ID is required".into()));
    }
    state
        .store
        .remove_interaction(InteractionKind::Saved, session.account_id, &payload.article_id)
        .await?;
    Ok(Json(MessageResponse {
        message: "Article unsaved successfully.",
    }))
}

pub async fn liked(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ArticleRecord>>, AppError> {
    let articles = state
        .store
        .interactions(InteractionKind::Liked, session.account_id)
        .await?;
    Ok(Json(articles))
}

pub async fn saved(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ArticleRecord>>, AppError> {
    let articles = state
        .store
        .interactions(InteractionKind::Saved, session.account_id)
        .await?;
    Ok(Json(articles))
}

pub async fn status(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<StatusResponse>, AppError> {
    let liked_articles = state
        .store
        .interaction_ids(InteractionKind::Liked, session.account_id)
        .await?;
    let saved_articles = state
        .store
        .interaction_ids(InteractionKind::Saved, session.account_id)
        .await?;
    Ok(Json(StatusResponse {
        liked_articles,
        saved_articles,
    }))
}
