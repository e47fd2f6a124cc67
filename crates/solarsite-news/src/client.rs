//! HTTP client for the news API's `/v1/news/all` search endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use solarsite_core::{NewsArticle, Settings};
use thiserror::Error;
use tracing::info;

pub const SEARCH_PATH: &str = "/v1/news/all";
pub const SEARCH_LIMIT: u32 = 10;
pub const SEARCH_LOCALE: &str = "us,ca";

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("NEWS_API_TOKEN environment variable not set")]
    MissingToken,
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can answer a search phrase with articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn search(&self, phrase: &str) -> Result<Vec<NewsArticle>, NewsError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<NewsArticle>>,
}

/// Decode a search response body. A body without `data` yields no articles.
pub fn parse_search_body(body: &str) -> Result<Vec<NewsArticle>, NewsError> {
    let resp: SearchResponse = serde_json::from_str(body)?;
    Ok(resp.data.unwrap_or_default())
}

/// News API client. No timeout or retry is configured beyond reqwest's
/// defaults.
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl NewsClient {
    /// Create a client for `host`.
    ///
    /// A bare host like `api.thenewsapi.com` is reached over HTTPS; a host
    /// with an explicit scheme is used as given.
    pub fn new(host: &str, api_token: String) -> Self {
        let host = host.trim_end_matches('/');
        let base_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_token,
        }
    }

    /// Build from settings, requiring a token.
    pub fn from_settings(settings: &Settings) -> Result<Self, NewsError> {
        let token = settings.news_api_token().ok_or(NewsError::MissingToken)?;
        Ok(Self::new(settings.news_api_host(), token.to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_request(&self, phrase: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let limit = SEARCH_LIMIT.to_string();
        self.client.get(url).query(&[
            ("api_token", self.api_token.as_str()),
            ("search", phrase),
            ("limit", limit.as_str()),
            ("locale", SEARCH_LOCALE),
        ])
    }

    /// Search for one phrase, surfacing every failure.
    pub async fn try_search(&self, phrase: &str) -> Result<Vec<NewsArticle>, NewsError> {
        info!(base_url = %self.base_url, search = %phrase, "searching news");
        let resp = self.search_request(phrase).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(NewsError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let articles = parse_search_body(&body)?;
        info!(count = articles.len(), search = %phrase, "search complete");
        Ok(articles)
    }
}

#[async_trait]
impl ArticleSource for NewsClient {
    async fn search(&self, phrase: &str) -> Result<Vec<NewsArticle>, NewsError> {
        self.try_search(phrase).await
    }
}
