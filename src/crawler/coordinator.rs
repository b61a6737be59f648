//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is a fixed four-level walk:
//!
//! ```text
//! topics page
//! └── dataset listing (/til/<dataset>/tie.html)
//!     └── release, Finnish original
//!         └── fi / en / sv variant      -> stored
//!             └── appendix tables       -> stored
//! ```
//!
//! Levels are visited depth-first in document order, one request at a time.
//! Nothing is caught here: the first error ends the run, and whatever was
//! stored until then is picked up from disk by the next run.

use crate::config::Config;
use crate::crawler::derive::{
    appendix_tables_from_publication, datasets_from_topics, language_variant,
    publications_from_dataset,
};
use crate::crawler::fetcher::{Fetcher, HttpSource, PageSource};
use crate::crawler::parser::HtmlPage;
use crate::crawler::scheduler::{Clock, TokioClock};
use crate::output::CrawlSummary;
use crate::storage::{CacheOutcome, FetchCache};
use crate::url::{DatasetId, Language, PagePath, PublicationUrl};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Traversal settings that are not about fetching
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Root of the hierarchy
    pub topics_path: PagePath,

    /// Store the topics page and dataset listings in the cache as well
    ///
    /// Off by default so every run sees newly published releases.
    pub cache_index_pages: bool,
}

impl CrawlOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            topics_path: PagePath::new(config.site.topics_path.clone()),
            cache_index_pages: config.crawler.cache_index_pages,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator<S, C = TokioClock> {
    fetcher: Fetcher<S, C>,
    cache: FetchCache,
    base_url: Url,
    options: CrawlOptions,
}

impl Coordinator<HttpSource> {
    /// Creates a coordinator for the live site described by `config`
    ///
    /// # Errors
    ///
    /// Fails if `output_dir` is not an existing directory or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config, output_dir: &Path) -> crate::Result<Self> {
        let source = HttpSource::from_config(&config.site, &config.user_agent)?;
        let base_url = source.base_url().clone();
        let fetcher = Fetcher::new(
            source,
            Duration::from_millis(config.crawler.stagger_ms),
            &config.site.content_selector,
        )?;
        let cache = FetchCache::open(output_dir)?;

        Ok(Self::with_parts(
            fetcher,
            cache,
            base_url,
            CrawlOptions::from_config(config),
        ))
    }
}

impl<S: PageSource, C: Clock> Coordinator<S, C> {
    /// Assembles a coordinator from already built parts
    pub fn with_parts(
        fetcher: Fetcher<S, C>,
        cache: FetchCache,
        base_url: Url,
        options: CrawlOptions,
    ) -> Self {
        Self {
            fetcher,
            cache,
            base_url,
            options,
        }
    }

    pub fn fetcher(&self) -> &Fetcher<S, C> {
        &self.fetcher
    }

    /// Runs the whole crawl
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Every dataset was walked to the end
    /// * `Err(CrawlError)` - The first failure; the crawl stops there
    pub async fn run(&mut self) -> crate::Result<CrawlSummary> {
        let mut summary = CrawlSummary::start();
        let requests_before = self.fetcher.requests_sent();

        // Topics page lists every dataset
        let topics_path = self.options.topics_path.clone();
        tracing::info!("Reading topics from {}", topics_path);
        let topics = self.fetch_index(&topics_path, &mut summary).await?;
        let datasets = datasets_from_topics(&self.page(&topics, &topics_path)?)?;
        summary.datasets = datasets.len() as u64;
        tracing::info!("Found {} datasets", datasets.len());

        // Walk datasets in page order, stopping at the first failure
        for dataset in &datasets {
            self.crawl_dataset(dataset, &mut summary).await?;
        }

        // Count only this run's requests
        summary.requests_sent = self.fetcher.requests_sent() - requests_before;
        summary.finish();
        Ok(summary)
    }

    async fn crawl_dataset(
        &mut self,
        dataset: &DatasetId,
        summary: &mut CrawlSummary,
    ) -> crate::Result<()> {
        let listing_path = dataset.tie_path();
        let listing = self.fetch_index(&listing_path, summary).await?;
        let publications =
            publications_from_dataset(dataset, &self.page(&listing, &listing_path)?)?;

        tracing::debug!("Dataset {}: {} publications", dataset, publications.len());
        summary.publications += publications.len() as u64;

        for publication in &publications {
            for language in Language::ALL {
                let variant = language_variant(publication, language);
                self.crawl_publication(&variant, summary).await?;
            }
        }

        Ok(())
    }

    async fn crawl_publication(
        &mut self,
        publication: &PublicationUrl,
        summary: &mut CrawlSummary,
    ) -> crate::Result<()> {
        let path = publication.path();
        tracing::info!("{}", path);

        // Release page itself
        let fetcher = &self.fetcher;
        let document = self
            .cache
            .fetch_or_get(&path, |p| fetcher.fetch_content(p))
            .await?;
        log_outcome(document.outcome, &document.file);
        summary.record(document.outcome);

        // Appendix tables linked from it, same language only
        tracing::debug!("Checking appendices of {}", path);
        let tables =
            appendix_tables_from_publication(publication, &self.page(&document.content, &path)?)?;
        summary.appendix_tables += tables.len() as u64;

        for table in &tables {
            let stored = self
                .cache
                .fetch_or_get(table, |p| fetcher.fetch_content(p))
                .await?;
            log_outcome(stored.outcome, &stored.file);
            summary.record(stored.outcome);
        }

        Ok(())
    }

    /// Fetches a listing page, through the cache only if configured to
    async fn fetch_index(
        &mut self,
        path: &PagePath,
        summary: &mut CrawlSummary,
    ) -> crate::Result<String> {
        let fetcher = &self.fetcher;

        if !self.options.cache_index_pages {
            return fetcher.fetch_page(path.clone()).await;
        }

        let page = self
            .cache
            .fetch_or_get(path, |p| fetcher.fetch_page(p))
            .await?;
        log_outcome(page.outcome, &page.file);
        summary.record(page.outcome);
        Ok(page.content)
    }

    fn page(&self, html: &str, path: &PagePath) -> crate::Result<HtmlPage> {
        let url = self.base_url.join(path.as_str())?;
        Ok(HtmlPage::parse(html, &url))
    }
}

fn log_outcome(outcome: CacheOutcome, file: &Path) {
    match outcome {
        CacheOutcome::Hit => tracing::info!("SKIP {}, already on disk", file.display()),
        CacheOutcome::Stored => tracing::info!("Saved to {}", file.display()),
    }
}
