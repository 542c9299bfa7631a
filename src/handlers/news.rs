use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    auth::session::Session,
    error::AppError,
    news::Article,
    recommend,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    recommended_articles: Vec<Article>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Article>>, AppError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Query parameter is required".into()))?;

    let articles = state.news.search(&query).await?;
    info!(count = articles.len(), "news search complete");
    Ok(Json(articles))
}

pub async fn recommendations(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let account = state
        .store
        .account_by_id(session.account_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    let age = account
        .age
        .filter(|a| !a.trim().is_empty())
        .ok_or(AppError::MissingAgeRange)?;

    // A dead upstream degrades to an empty list rather than an error page.
    let candidates = match state.news.top_headlines().await {
        Ok(articles) => articles,
        Err(e) => {
            warn!("headline fetch failed, returning no recommendations: {e}");
            Vec::new()
        }
    };

    Ok(Json(RecommendationsResponse {
        recommended_articles: recommend::recommend(&age, &candidates),
    }))
}
