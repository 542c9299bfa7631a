//! Thin client for the upstream news API (GNews-shaped endpoints).

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("news API returned HTTP {0}")]
    Status(StatusCode),
}

/// One article as the upstream returns it. Fields pass through to API
/// responses unchanged, so serialization keeps the upstream key names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    pub published_at: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArticlesEnvelope {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Clone)]
pub struct NewsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl NewsClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Article>, NewsError> {
        self.fetch("search", &[("q", query)]).await
    }

    pub async fn top_headlines(&self) -> Result<Vec<Article>, NewsError> {
        self.fetch("top-headlines", &[]).await
    }

    async fn fetch(&self, path: &str, extra: &[(&str, &str)]) -> Result<Vec<Article>, NewsError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(&[("lang", "en"), ("token", self.api_key.as_str())])
            .query(extra)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status(status));
        }

        let envelope: ArticlesEnvelope = response.json().await?;
        debug!(count = envelope.articles.len(), endpoint = path, "fetched articles");
        Ok(envelope.articles)
    }
}
