//! Storage module for persisting fetched documents
//!
//! The output directory is the only persisted state: one flat file per
//! fetched page, named by its cache key. A file that exists is never fetched
//! again, which makes an interrupted crawl resumable by simply re-running it.

mod cache;

pub use cache::{CacheOutcome, CachedPage, FetchCache};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Output directory does not exist or is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to read cached document {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write document {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache key '{key}' is shared by {existing} and {incoming}")]
    KeyCollision {
        key: String,
        existing: String,
        incoming: String,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
