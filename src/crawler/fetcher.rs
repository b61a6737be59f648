//! HTTP fetcher implementation
//!
//! This module handles all outbound requests for the crawler:
//! - Building the HTTP client with the configured user agent
//! - The [`PageSource`] seam over "GET a path, return the body text"
//! - Pacing every request through the [`RateLimiter`]
//! - Cutting the stored document out of a page at the content anchor

use crate::config::{SiteConfig, UserAgentConfig};
use crate::crawler::scheduler::{Clock, RateLimiter, TokioClock};
use crate::url::PagePath;
use crate::{ConfigError, CrawlError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

/// Something that can GET a server-relative path and return the body text
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_text(&self, path: &PagePath) -> crate::Result<String>;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use statfi_crawler::config::UserAgentConfig;
/// use statfi_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageSource`] for a live site: joins each path onto the base URL
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Builds the client and base URL from the site and user agent settings
    pub fn from_config(site: &SiteConfig, user_agent: &UserAgentConfig) -> crate::Result<Self> {
        let base_url = Url::parse(&site.base_url)?;
        let client = build_http_client(user_agent, Duration::from_secs(site.request_timeout_secs))?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, path: &PagePath) -> crate::Result<Url> {
        Ok(self.base_url.join(path.as_str())?)
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn get_text(&self, path: &PagePath) -> crate::Result<String> {
        let url = self.url_for(path)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| CrawlError::Http {
            url: url.to_string(),
            source,
        })
    }
}

/// Parses a CSS selector for the content anchor
pub fn parse_content_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", selector, e)))
}

/// Re-serializes the first element matching `selector`
pub fn extract_content(html: &str, selector: &Selector) -> Option<String> {
    let document = Html::parse_document(html);
    document.select(selector).next().map(|element| element.html())
}

/// Rate-limited access to a [`PageSource`]
///
/// Every request, whatever it is for, passes through the same limiter.
pub struct Fetcher<S, C = TokioClock> {
    source: S,
    limiter: RateLimiter<C>,
    content_selector: Selector,
    selector_text: String,
    requests_sent: AtomicU64,
}

impl<S: PageSource> Fetcher<S, TokioClock> {
    /// Creates a fetcher paced on the wall clock
    pub fn new(source: S, stagger: Duration, content_selector: &str) -> Result<Self, ConfigError> {
        Self::with_limiter(source, RateLimiter::new(stagger), content_selector)
    }
}

impl<S: PageSource, C: Clock> Fetcher<S, C> {
    pub fn with_limiter(
        source: S,
        limiter: RateLimiter<C>,
        content_selector: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            source,
            limiter,
            content_selector: parse_content_selector(content_selector)?,
            selector_text: content_selector.to_string(),
            requests_sent: AtomicU64::new(0),
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of requests issued so far
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Fetches a whole page, waiting for the stagger first
    pub async fn fetch_page(&self, path: PagePath) -> crate::Result<String> {
        self.limiter.wait_then_mark().await;
        self.requests_sent.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("GET {}", path);
        self.source.get_text(&path).await
    }

    /// Fetches a page and keeps only the content anchor element
    ///
    /// # Errors
    ///
    /// [`CrawlError::MissingContent`] if the page has no matching element.
    pub async fn fetch_content(&self, path: PagePath) -> crate::Result<String> {
        let html = self.fetch_page(path.clone()).await?;
        extract_content(&html, &self.content_selector).ok_or_else(|| CrawlError::MissingContent {
            path: path.to_string(),
            selector: self.selector_text.clone(),
        })
    }
}
