//! HTTP client trait and implementations.
//!
//! Every network touchpoint in the pipeline goes through [`HttpClient`] so
//! tests can run against [`MockClient`] without network access.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::FetchError;

/// Result of a HEAD probe against a candidate URL.
#[derive(Debug, Clone)]
pub struct HeadResponse {
    pub success: bool,
    pub content_type: Option<String>,
}

/// Trait for HTTP clients, enabling mockability in tests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch page content from a URL. One attempt, no retries.
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError>;

    /// Issue a HEAD request, returning status and content type.
    async fn head(&self, url: &str) -> Result<HeadResponse, FetchError>;
}

/// Fixed browser-mimicking request headers, sent on every fetch.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

/// Production HTTP client: a pooled reqwest client with fixed browser-like
/// headers and a request timeout.
pub struct PageClient {
    inner: reqwest::Client,
}

impl PageClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl HttpClient for PageClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        tracing::debug!(url, "fetching page");
        let response = self.inner.get(parsed).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn head(&self, url: &str) -> Result<HeadResponse, FetchError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = self
            .inner
            .head(parsed)
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        Ok(HeadResponse {
            success: response.status().is_success(),
            content_type,
        })
    }
}

/// Mock page response for testing.
#[derive(Clone)]
pub enum MockResponse {
    Html(String),
    Error(String),
}

/// Mock HTTP client for testing.
#[derive(Default)]
pub struct MockClient {
    pages: HashMap<String, MockResponse>,
    heads: HashMap<String, HeadResponse>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an HTML response for a URL.
    pub fn with_html(mut self, url: &str, html: &str) -> Self {
        self.pages
            .insert(url.to_string(), MockResponse::Html(html.to_string()));
        self
    }

    /// Register a fetch failure for a URL.
    pub fn with_error(mut self, url: &str, error: &str) -> Self {
        self.pages
            .insert(url.to_string(), MockResponse::Error(error.to_string()));
        self
    }

    /// Register a successful HEAD response with the given content type.
    pub fn with_head(mut self, url: &str, content_type: &str) -> Self {
        self.heads.insert(
            url.to_string(),
            HeadResponse {
                success: true,
                content_type: Some(content_type.to_string()),
            },
        );
        self
    }

    /// Register a failing HEAD response.
    pub fn with_head_failure(mut self, url: &str) -> Self {
        self.heads.insert(
            url.to_string(),
            HeadResponse {
                success: false,
                content_type: None,
            },
        );
        self
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        match self.pages.get(url) {
            Some(MockResponse::Html(html)) => Ok(html.clone()),
            Some(MockResponse::Error(e)) => Err(FetchError::InvalidUrl(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }

    async fn head(&self, url: &str) -> Result<HeadResponse, FetchError> {
        self.heads.get(url).cloned().ok_or_else(|| {
            FetchError::InvalidUrl(format!("No mock HEAD response for URL: {}", url))
        })
    }
}
