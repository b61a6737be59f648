use crate::storage::CacheOutcome;
use chrono::{DateTime, Utc};

/// Counters for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Datasets found on the topics page
    pub datasets: u64,

    /// Finnish releases found across all dataset listings
    pub publications: u64,

    /// Appendix table links followed
    pub appendix_tables: u64,

    /// Documents fetched and written this run
    pub documents_stored: u64,

    /// Documents already on disk
    pub documents_cached: u64,

    /// Outbound HTTP requests, index pages included
    pub requests_sent: u64,
}

impl CrawlSummary {
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            datasets: 0,
            publications: 0,
            appendix_tables: 0,
            documents_stored: 0,
            documents_cached: 0,
            requests_sent: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }

    pub fn record(&mut self, outcome: CacheOutcome) {
        match outcome {
            CacheOutcome::Hit => self.documents_cached += 1,
            CacheOutcome::Stored => self.documents_stored += 1,
        }
    }
}

/// Logs the summary at info level
pub fn log_summary(summary: &CrawlSummary) {
    let seconds = summary
        .duration()
        .map(|d| d.num_milliseconds() as f64 / 1000.0)
        .unwrap_or(0.0);

    tracing::info!(
        "Crawl finished in {:.1}s: {} datasets, {} publications, {} appendix tables",
        seconds,
        summary.datasets,
        summary.publications,
        summary.appendix_tables
    );
    tracing::info!(
        "Documents: {} saved, {} already on disk; {} requests sent",
        summary.documents_stored,
        summary.documents_cached,
        summary.requests_sent
    );
}
