//! HTML link queries
//!
//! Pages are parsed with `scraper` and queried through [`DocumentQuery`]:
//! "give me every link whose path has this shape". Any element carrying an
//! `href` counts as a link. Each href is resolved against the page's own URL
//! before matching, so relative and absolute links are treated alike.

use crate::url::{LinkShape, PagePath};
use scraper::{Html, Selector};
use url::Url;

/// Capability to find links of a given shape in a parsed document
pub trait DocumentQuery {
    /// Paths of every link matching `shape`, in document order
    ///
    /// Duplicates are kept.
    fn links_matching(&self, shape: &LinkShape) -> Vec<PagePath>;
}

/// A parsed HTML page together with the URL it was fetched from
pub struct HtmlPage {
    document: Html,
    base_url: Url,
}

impl HtmlPage {
    /// Parses `html`; relative links will be resolved against `base_url`
    ///
    /// # Example
    ///
    /// ```
    /// use statfi_crawler::crawler::{DocumentQuery, HtmlPage};
    /// use statfi_crawler::url::LinkShape;
    /// use url::Url;
    ///
    /// let html = r#"<a href="/til/vtp/index.html">Kansantalous</a>"#;
    /// let base = Url::parse("http://www.tilastokeskus.fi/til/aiheet.html").unwrap();
    /// let page = HtmlPage::parse(html, &base);
    /// let links = page.links_matching(&LinkShape::dataset_index().unwrap());
    /// assert_eq!(links[0].as_str(), "/til/vtp/index.html");
    /// ```
    pub fn parse(html: &str, base_url: &Url) -> Self {
        Self {
            document: Html::parse_document(html),
            base_url: base_url.clone(),
        }
    }

    /// Paths of every resolvable link on the page, in document order
    pub fn link_paths(&self) -> Vec<PagePath> {
        let mut paths = Vec::new();

        if let Ok(selector) = Selector::parse("[href]") {
            for element in self.document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    if let Some(url) = resolve_link(href, &self.base_url) {
                        paths.push(PagePath::new(url.path()));
                    }
                }
            }
        }

        paths
    }
}

impl DocumentQuery for HtmlPage {
    fn links_matching(&self, shape: &LinkShape) -> Vec<PagePath> {
        let links: Vec<PagePath> = self
            .link_paths()
            .into_iter()
            .filter(|path| shape.matches(path.as_str()))
            .collect();

        tracing::trace!(
            "{} {} link(s) on {}",
            links.len(),
            shape.name(),
            self.base_url
        );
        links
    }
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be ignored:
/// - javascript:, mailto:, tel: and data: hrefs
/// - fragment-only and empty hrefs
/// - hrefs that do not resolve to an HTTP(S) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
