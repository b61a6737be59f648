//! Configuration module for statfi-crawler
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a crawl can run with no
//! file at all.
//!
//! # Example
//!
//! ```no_run
//! use statfi_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Stagger: {}ms", config.crawler.stagger_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, SiteConfig, UserAgentConfig, DEFAULT_BASE_URL, DEFAULT_STAGGER_MS,
};

// Re-export parser functions
pub use parser::{config_fingerprint, load_config, parse_config};
pub use validation::validate;
