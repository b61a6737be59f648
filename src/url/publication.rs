use crate::url::shapes::cached_regex;
use crate::url::PagePath;
use crate::{UrlError, UrlResult};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

static PUBLICATION_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Language a publication is released in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Fi,
    En,
    Sv,
}

impl Language {
    /// Crawl order: the Finnish original first, then its translations
    pub const ALL: [Language; 3] = [Language::Fi, Language::En, Language::Sv];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Fi => "fi",
            Self::En => "en",
            Self::Sv => "sv",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fi" => Ok(Self::Fi),
            "en" => Ok(Self::En),
            "sv" => Ok(Self::Sv),
            _ => Err(UrlError::MalformedShape {
                url: s.to_string(),
                expected: "language code (fi, en, sv)",
            }),
        }
    }
}

/// A release page path split into its parts
///
/// `/til/vtp/2023/vtp_2023_tie_001_fi.html` parses into release prefix
/// `/til/vtp/2023/vtp_2023`, sequence number `001` and language `fi`. The
/// sequence number keeps its leading zeros so [`PublicationUrl::path`]
/// reproduces the original path exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PublicationUrl {
    pub release_prefix: String,
    pub sequence_number: String,
    pub language: Language,
}

impl PublicationUrl {
    /// Parses `<prefix>_tie_<digits>_<lang>.html`
    ///
    /// # Errors
    ///
    /// [`UrlError::MalformedShape`] if the path does not have that shape.
    pub fn parse(path: &str) -> UrlResult<Self> {
        let pattern = cached_regex(
            &PUBLICATION_PATTERN,
            r"^(.+)_tie_(\d+)_(fi|en|sv)\.html$",
        )?;

        let malformed = || UrlError::MalformedShape {
            url: path.to_string(),
            expected: "<prefix>_tie_<digits>_<lang>.html",
        };

        let caps = pattern.captures(path).ok_or_else(malformed)?;
        let (prefix, sequence, language) = match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(p), Some(s), Some(l)) => (p.as_str(), s.as_str(), l.as_str()),
            _ => return Err(malformed()),
        };

        Ok(Self {
            release_prefix: prefix.to_string(),
            sequence_number: sequence.to_string(),
            language: language.parse()?,
        })
    }

    /// The same release in another language
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            language,
            ..self.clone()
        }
    }

    pub fn path(&self) -> PagePath {
        PagePath::new(format!(
            "{}_tie_{}_{}.html",
            self.release_prefix, self.sequence_number, self.language
        ))
    }
}

impl fmt::Display for PublicationUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_tie_{}_{}.html",
            self.release_prefix, self.sequence_number, self.language
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE: &str = "/til/vtp/2023/vtp_2023_tie_001_fi.html";

    #[test]
    fn test_parse_publication() {
        let publication = PublicationUrl::parse(RELEASE).unwrap();
        assert_eq!(publication.release_prefix, "/til/vtp/2023/vtp_2023");
        assert_eq!(publication.sequence_number, "001");
        assert_eq!(publication.language, Language::Fi);
    }

    #[test]
    fn test_path_round_trips() {
        let publication = PublicationUrl::parse(RELEASE).unwrap();
        assert_eq!(publication.path().as_str(), RELEASE);
        assert_eq!(publication.to_string(), RELEASE);
    }

    #[test]
    fn test_parse_other_languages() {
        let en = PublicationUrl::parse("/til/vtp/2023/vtp_2023_tie_001_en.html").unwrap();
        assert_eq!(en.language, Language::En);
        let sv = PublicationUrl::parse("/til/vtp/2023/vtp_2023_tie_001_sv.html").unwrap();
        assert_eq!(sv.language, Language::Sv);
    }

    #[test]
    fn test_parse_rejects_table_page() {
        let err = PublicationUrl::parse("/til/vtp/2023/vtp_2023_tau_001_fi.html").unwrap_err();
        assert!(matches!(err, UrlError::MalformedShape { .. }));
    }

    #[test]
    fn test_parse_rejects_unknown_language() {
        assert!(PublicationUrl::parse("/til/vtp/2023/vtp_2023_tie_001_de.html").is_err());
    }

    #[test]
    fn test_parse_rejects_missing_digits() {
        assert!(PublicationUrl::parse("/til/vtp/2023/vtp_2023_tie__fi.html").is_err());
        assert!(PublicationUrl::parse("/til/vtp/tie.html").is_err());
    }

    #[test]
    fn test_with_language_changes_only_language() {
        let fi = PublicationUrl::parse(RELEASE).unwrap();
        let en = fi.with_language(Language::En);

        assert_eq!(en.release_prefix, fi.release_prefix);
        assert_eq!(en.sequence_number, fi.sequence_number);
        assert_eq!(en.path().as_str(), "/til/vtp/2023/vtp_2023_tie_001_en.html");
        assert_eq!(en.with_language(Language::Fi), fi);
    }

    #[test]
    fn test_language_codes() {
        for language in Language::ALL {
            assert_eq!(language.code().parse::<Language>().unwrap(), language);
        }
        assert!("de".parse::<Language>().is_err());
    }
}
