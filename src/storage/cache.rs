//! On-disk fetch cache
//!
//! Documents are written to a temporary sibling and renamed into place, so a
//! file under its final name is always complete.

use crate::storage::{StorageError, StorageResult};
use crate::url::{normalize_cache_key, PagePath};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Whether a document came from disk or was fetched just now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Already on disk; no request was made
    Hit,
    /// Fetched and written to disk
    Stored,
}

/// A document returned by [`FetchCache::fetch_or_get`]
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub content: String,
    pub outcome: CacheOutcome,
    /// Location of the document in the output directory
    pub file: PathBuf,
}

/// Flat directory of fetched documents keyed by normalized path
#[derive(Debug)]
pub struct FetchCache {
    root: PathBuf,
    /// Paths seen this run, by key, to catch two paths sharing one file
    keys: HashMap<String, PagePath>,
}

impl FetchCache {
    /// Opens the cache in an existing directory
    ///
    /// # Errors
    ///
    /// [`StorageError::NotADirectory`] if `root` is missing or not a directory.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(StorageError::NotADirectory(root));
        }
        Ok(Self {
            root,
            keys: HashMap::new(),
        })
    }

    /// File a path is (or would be) stored under
    pub fn file_for(&self, path: &PagePath) -> crate::Result<PathBuf> {
        let key = normalize_cache_key(path)?;
        Ok(self.root.join(key))
    }

    /// Returns the cached document for `path`, fetching and storing it first
    /// if it is not on disk yet
    ///
    /// `fetch` is only invoked on a miss, and its output is written verbatim.
    /// A cached file is returned as-is without any freshness check.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures, filesystem errors, and
    /// [`StorageError::KeyCollision`] when another path seen in this run maps
    /// to the same file.
    pub async fn fetch_or_get<F, Fut>(&mut self, path: &PagePath, fetch: F) -> crate::Result<CachedPage>
    where
        F: FnOnce(PagePath) -> Fut,
        Fut: Future<Output = crate::Result<String>>,
    {
        let key = normalize_cache_key(path)?;
        self.claim_key(&key, path)?;
        let file = self.root.join(&key);

        let exists = tokio::fs::try_exists(&file)
            .await
            .map_err(|source| StorageError::Read {
                path: file.clone(),
                source,
            })?;

        // Already on disk: return it as-is
        if exists {
            let content = tokio::fs::read_to_string(&file)
                .await
                .map_err(|source| StorageError::Read {
                    path: file.clone(),
                    source,
                })?;
            return Ok(CachedPage {
                content,
                outcome: CacheOutcome::Hit,
                file,
            });
        }

        // Miss: fetch, then store
        let content = fetch(path.clone()).await?;
        write_atomically(&file, &key, &content).await?;

        Ok(CachedPage {
            content,
            outcome: CacheOutcome::Stored,
            file,
        })
    }

    fn claim_key(&mut self, key: &str, path: &PagePath) -> StorageResult<()> {
        match self.keys.get(key) {
            Some(existing) if existing != path => Err(StorageError::KeyCollision {
                key: key.to_string(),
                existing: existing.to_string(),
                incoming: path.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.keys.insert(key.to_string(), path.clone());
                Ok(())
            }
        }
    }
}

async fn write_atomically(file: &Path, key: &str, content: &str) -> StorageResult<()> {
    let tmp = file.with_file_name(format!(".{}.partial", key));

    tokio::fs::write(&tmp, content.as_bytes())
        .await
        .map_err(|source| StorageError::Write {
            path: tmp.clone(),
            source,
        })?;

    tokio::fs::rename(&tmp, file)
        .await
        .map_err(|source| StorageError::Write {
            path: file.to_path_buf(),
            source,
        })?;

    Ok(())
}
