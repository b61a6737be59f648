//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic, including:
//! - Request pacing behind a single rate limiter
//! - HTTP fetching and content extraction
//! - HTML parsing and link queries
//! - Link derivation between traversal levels
//! - Overall crawl coordination

mod coordinator;
mod derive;
mod fetcher;
mod parser;
mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{Coordinator, CrawlOptions};
pub use derive::{
    appendix_tables_from_publication, datasets_from_topics, language_variant,
    publications_from_dataset,
};
pub use fetcher::{
    build_http_client, extract_content, parse_content_selector, Fetcher, HttpSource, PageSource,
};
pub use parser::{DocumentQuery, HtmlPage};
pub use scheduler::{Clock, RateLimiter, TokioClock};

pub use crate::output::CrawlSummary;

use crate::config::Config;
use crate::CrawlError;
use std::path::Path;

/// Runs a complete crawl against the live site
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the output directory as the fetch cache
/// 2. Build the HTTP client and rate limiter
/// 3. Walk topics, datasets, publications and appendix tables
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `output_dir` - Existing directory the documents are stored in
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed successfully
/// * `Err(CrawlError)` - Crawl stopped at the first failure
pub async fn crawl(config: &Config, output_dir: &Path) -> Result<CrawlSummary, CrawlError> {
    let mut coordinator = Coordinator::new(config, output_dir)?;
    coordinator.run().await
}
