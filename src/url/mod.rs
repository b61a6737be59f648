//! URL handling module for statfi-crawler
//!
//! Every page on the publisher's site is addressed by a server-relative path.
//! The structure encoded in those paths (dataset slug, release prefix,
//! sequence number, language) is parsed once into the value types here, and
//! the link patterns used to walk the hierarchy are kept as named
//! [`LinkShape`] predicates.

mod normalize;
mod publication;
mod shapes;

use crate::{UrlError, UrlResult};
use std::fmt;

pub use normalize::normalize_cache_key;
pub use publication::{Language, PublicationUrl};
pub use shapes::LinkShape;

/// A server-relative page path such as `/til/vtp/index.html`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PagePath(String);

impl PagePath {
    /// Wraps a path; callers pass paths that start with `/`
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PagePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Slug identifying one statistical topic, e.g. `vtp`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetId(String);

impl DatasetId {
    /// Accepts word characters only, the same alphabet the topics page links use
    pub fn new(slug: impl Into<String>) -> UrlResult<Self> {
        let slug = slug.into();
        if slug.is_empty() || !slug.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(UrlError::InvalidDataset(slug));
        }
        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the dataset's release listing
    pub fn tie_path(&self) -> PagePath {
        PagePath::new(format!("/til/{}/tie.html", self.0))
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
