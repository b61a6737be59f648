//! statfi-crawler main entry point
//!
//! This is the command-line interface for the corpus downloader.

use clap::Parser;
use std::path::{Path, PathBuf};
use statfi_crawler::config::{config_fingerprint, parse_config, Config, DEFAULT_STAGGER_MS};
use statfi_crawler::crawler::crawl;
use statfi_crawler::output::{load_statistics, log_summary, print_statistics};
use tracing_subscriber::EnvFilter;

/// statfi-crawler: crawl a corpus out of the Statistics Finland website
///
/// Publications in all three languages and their appendix tables are stored
/// as one file each in OUTPUT_DIR. Files already there are never fetched
/// again, so an interrupted crawl continues where it stopped.
#[derive(Parser, Debug)]
#[command(name = "statfi-crawler")]
#[command(version)]
#[command(about = "Crawl a corpus out of the Statistics Finland website", long_about = None)]
struct Cli {
    /// Local directory to store the documents in (must exist)
    #[arg(value_name = "OUTPUT_DIR", value_parser = dir_path)]
    output_dir: PathBuf,

    /// Minimum time in milliseconds between two subsequent HTTP requests
    /// [default: 1000]
    #[arg(short, long, value_name = "MS")]
    stagger: Option<u64>,

    /// Only output errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Also keep the topics page and dataset listings in OUTPUT_DIR
    #[arg(long)]
    cache_index: bool,

    /// Show the effective configuration without crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Summarize the documents already in OUTPUT_DIR and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

/// Accepts only paths to existing directories
fn dir_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("not a directory: {}", value))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_effective_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &cli.output_dir);
    } else if cli.stats {
        handle_stats(&cli.output_dir)?;
    } else {
        handle_crawl(&config, &cli.output_dir).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("statfi_crawler=info,warn"),
            1 => EnvFilter::new("statfi_crawler=debug,info"),
            _ => EnvFilter::new("statfi_crawler=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Reads the config file if one was given, then applies command-line overrides
fn load_effective_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            // Hash the exact text that gets parsed
            let text = std::fs::read_to_string(path)?;
            let config = parse_config(&text)?;
            tracing::info!(
                "Configuration loaded successfully (hash: {})",
                config_fingerprint(&text)
            );
            config
        }
        None => Config::default(),
    };

    if let Some(stagger) = cli.stagger {
        config.crawler.stagger_ms = stagger;
    }
    if cli.cache_index {
        config.crawler.cache_index_pages = true;
    }

    statfi_crawler::config::validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what a crawl would use
fn handle_dry_run(config: &Config, output_dir: &Path) {
    println!("=== statfi-crawler Dry Run ===\n");

    println!("Crawler:");
    println!("  Stagger: {}ms", config.crawler.stagger_ms);
    if config.crawler.stagger_ms != DEFAULT_STAGGER_MS {
        println!("    (default is {}ms)", DEFAULT_STAGGER_MS);
    }
    println!("  Cache index pages: {}", config.crawler.cache_index_pages);

    println!("\nSite:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Topics: {}", config.site.topics_path);
    println!("  Content selector: {}", config.site.content_selector);
    println!("  Request timeout: {}s", config.site.request_timeout_secs);

    println!("\nUser Agent: {}", config.user_agent.header_value());
    println!("\nOutput: {}", output_dir.display());

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the output directory
fn handle_stats(output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Output directory: {}\n", output_dir.display());

    let stats = load_statistics(output_dir)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} into {} (stagger {}ms)",
        config.site.base_url,
        output_dir.display(),
        config.crawler.stagger_ms
    );

    match crawl(config, output_dir).await {
        Ok(summary) => {
            log_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
