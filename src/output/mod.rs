//! Output module for crawl summaries and reports
//!
//! This module handles:
//! - The per-run [`CrawlSummary`] returned by the coordinator
//! - Statistics over an existing output directory (`--stats`)

pub mod stats;
mod summary;

pub use stats::{classify_document, load_statistics, print_statistics, CacheStatistics, DocumentKind};
pub use summary::{log_summary, CrawlSummary};
