//! Link derivation between traversal levels
//!
//! Each function turns one level's page into the next level's URLs. They are
//! pure over an already fetched [`DocumentQuery`] and never touch the network.

use crate::crawler::parser::DocumentQuery;
use crate::url::{DatasetId, Language, LinkShape, PagePath, PublicationUrl};
use crate::UrlResult;

/// Dataset slugs linked from the topics page, in document order
pub fn datasets_from_topics(topics: &impl DocumentQuery) -> UrlResult<Vec<DatasetId>> {
    let shape = LinkShape::dataset_index()?;
    let links = topics.links_matching(&shape);

    links
        .iter()
        .filter_map(|path| shape.capture(path.as_str()))
        .map(DatasetId::new)
        .collect()
}

/// Finnish release pages linked from a dataset's `tie.html`
///
/// # Errors
///
/// [`crate::UrlError::MalformedShape`] if a matching link cannot be parsed as
/// a publication.
pub fn publications_from_dataset(
    dataset: &DatasetId,
    listing: &impl DocumentQuery,
) -> UrlResult<Vec<PublicationUrl>> {
    let shape = LinkShape::release_page(dataset)?;
    let links = listing.links_matching(&shape);

    links
        .iter()
        .map(|path| PublicationUrl::parse(path.as_str()))
        .collect()
}

/// The sibling of `publication` in `language`
///
/// Siblings are derived, never discovered: the site publishes every release
/// under the same prefix and sequence number in all three languages.
pub fn language_variant(publication: &PublicationUrl, language: Language) -> PublicationUrl {
    publication.with_language(language)
}

/// Appendix tables of exactly this release and language
pub fn appendix_tables_from_publication(
    publication: &PublicationUrl,
    content: &impl DocumentQuery,
) -> UrlResult<Vec<PagePath>> {
    let shape = LinkShape::appendix_table(publication)?;
    Ok(content.links_matching(&shape))
}
