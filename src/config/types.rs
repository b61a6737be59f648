use serde::Deserialize;

/// Default minimum delay between two outbound requests (milliseconds)
pub const DEFAULT_STAGGER_MS: u64 = 1000;

/// Default site root that server-relative paths are joined onto
pub const DEFAULT_BASE_URL: &str = "http://www.tilastokeskus.fi";

/// Main configuration structure for statfi-crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Minimum time between two outbound requests (milliseconds)
    #[serde(rename = "stagger-ms", default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// Route the topics and dataset index pages through the cache as well
    #[serde(rename = "cache-index-pages", default)]
    pub cache_index_pages: bool,
}

/// Target site layout
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host that every crawled path is resolved against
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Server-relative path of the topic listing
    #[serde(rename = "topics-path", default = "default_topics_path")]
    pub topics_path: String,

    /// CSS selector of the element stored for each document
    #[serde(rename = "content-selector", default = "default_content_selector")]
    pub content_selector: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// `Name/Version` or `Name/Version (+ContactURL)` when a contact URL is set.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger_ms(),
            cache_index_pages: false,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            topics_path: default_topics_path(),
            content_selector: default_content_selector(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_stagger_ms() -> u64 {
    DEFAULT_STAGGER_MS
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_topics_path() -> String {
    "/til/aiheet.html".to_string()
}

fn default_content_selector() -> String {
    "#content".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_crawler_name() -> String {
    "statfi-crawler".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
