//! Statistics over an output directory
//!
//! Documents are classified purely by file name, so this works on any
//! directory the crawler has written to, including partial runs.

use crate::storage::StorageError;
use crate::url::Language;
use crate::CrawlError;
use std::collections::BTreeMap;
use std::path::Path;

/// What a cached file holds, judged by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Publication(Language),
    AppendixTable(Language),
    Other,
}

/// Totals for an output directory
#[derive(Debug, Clone, Default)]
pub struct CacheStatistics {
    pub total_documents: u64,
    pub total_bytes: u64,
    pub publications: BTreeMap<Language, u64>,
    pub appendix_tables: BTreeMap<Language, u64>,
    pub other_documents: u64,
}

/// Classifies a cache file name such as `til_vtp_2023_vtp_2023_tau_001_sv.html`
pub fn classify_document(name: &str) -> DocumentKind {
    let Some(stem) = name.strip_suffix(".html") else {
        return DocumentKind::Other;
    };

    let mut parts = stem.rsplitn(4, '_');
    let (Some(language), Some(sequence), Some(marker), Some(prefix)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return DocumentKind::Other;
    };

    let Ok(language) = language.parse::<Language>() else {
        return DocumentKind::Other;
    };

    if prefix.is_empty() || sequence.is_empty() || !sequence.chars().all(|c| c.is_ascii_digit()) {
        return DocumentKind::Other;
    }

    match marker {
        "tie" => DocumentKind::Publication(language),
        "tau" => DocumentKind::AppendixTable(language),
        _ => DocumentKind::Other,
    }
}

/// Scans `dir` and tallies the documents in it
///
/// Unfinished `.partial` files and subdirectories are ignored.
pub fn load_statistics(dir: &Path) -> Result<CacheStatistics, CrawlError> {
    if !dir.is_dir() {
        return Err(StorageError::NotADirectory(dir.to_path_buf()).into());
    }

    let mut stats = CacheStatistics::default();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".partial") {
            continue;
        }

        stats.total_documents += 1;
        stats.total_bytes += metadata.len();

        match classify_document(&name) {
            DocumentKind::Publication(language) => {
                *stats.publications.entry(language).or_insert(0) += 1;
            }
            DocumentKind::AppendixTable(language) => {
                *stats.appendix_tables.entry(language).or_insert(0) += 1;
            }
            DocumentKind::Other => stats.other_documents += 1,
        }
    }

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CacheStatistics) {
    println!("=== Cache Statistics ===\n");

    println!("Overview:");
    println!("  Documents on disk: {}", stats.total_documents);
    println!("  Total size: {:.1} KiB", stats.total_bytes as f64 / 1024.0);
    println!();

    println!("Publications by Language:");
    for language in Language::ALL {
        println!(
            "  {}: {}",
            language,
            stats.publications.get(&language).unwrap_or(&0)
        );
    }
    println!();

    println!("Appendix Tables by Language:");
    for language in Language::ALL {
        println!(
            "  {}: {}",
            language,
            stats.appendix_tables.get(&language).unwrap_or(&0)
        );
    }
    println!();

    if stats.other_documents > 0 {
        println!("Other documents: {}", stats.other_documents);
    }
}
