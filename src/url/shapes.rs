//! Named link predicates for walking the site hierarchy

use crate::url::{DatasetId, PublicationUrl};
use crate::UrlResult;
use regex::Regex;
use std::sync::OnceLock;

static DATASET_INDEX_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Compiles `pattern` once and keeps it in `cell`
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Regex>,
    pattern: &str,
) -> UrlResult<&'static Regex> {
    if let Some(regex) = cell.get() {
        return Ok(regex);
    }
    let regex = Regex::new(pattern)?;
    Ok(cell.get_or_init(|| regex))
}

/// A pattern a resolved link path has to match in full
#[derive(Debug, Clone)]
pub struct LinkShape {
    name: &'static str,
    pattern: Regex,
}

impl LinkShape {
    /// `/til/<slug>/index.html`, capturing the slug
    pub fn dataset_index() -> UrlResult<Self> {
        let pattern = cached_regex(&DATASET_INDEX_PATTERN, r"^/til/(\w+)/index\.html$")?;
        Ok(Self {
            name: "dataset index",
            pattern: pattern.clone(),
        })
    }

    /// Finnish release pages of one dataset: `/til/<dataset>/…_tie_<digits>_fi.html`
    pub fn release_page(dataset: &DatasetId) -> UrlResult<Self> {
        let pattern = Regex::new(&format!(
            r"^/til/{}/.*_tie_\d+_fi\.html$",
            regex::escape(dataset.as_str())
        ))?;
        Ok(Self {
            name: "release page",
            pattern,
        })
    }

    /// Appendix tables of one release in one language:
    /// `<release_prefix>_tau_<digits>_<lang>.html`
    pub fn appendix_table(publication: &PublicationUrl) -> UrlResult<Self> {
        let pattern = Regex::new(&format!(
            r"^{}_tau_\d+_{}\.html$",
            regex::escape(&publication.release_prefix),
            publication.language
        ))?;
        Ok(Self {
            name: "appendix table",
            pattern,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    /// First capture group of a matching path
    pub fn capture<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(path)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}
