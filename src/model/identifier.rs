//! Parsed model identifiers: `<family>` or `<family>-<languageCode>`.

use std::fmt;

use crate::i18n::{Language, LanguageRegistry};

/// A model identifier split into its family and optional language tag.
///
/// Parsed once at the request boundary so nothing downstream has to look at
/// the raw string again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelIdentifier {
    pub family: String,
    pub language: Option<Language>,
}

impl ModelIdentifier {
    /// Parse a raw identifier.
    ///
    /// The last hyphen-delimited segment is taken as a language tag only when
    /// it is an enabled code in `languages`; otherwise the whole string is the
    /// family. Parsing never fails: whether the family exists is the
    /// resolver's concern.
    pub fn parse(raw: &str, languages: &LanguageRegistry) -> Self {
        if let Some((family, suffix)) = raw.rsplit_once('-') {
            if let Some(language) = languages.language(suffix) {
                return Self {
                    family: family.to_string(),
                    language: Some(language),
                };
            }
        }

        Self {
            family: raw.to_string(),
            language: None,
        }
    }
}

impl fmt::Display for ModelIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.language {
            Some(language) => write!(f, "{}-{}", self.family, language),
            None => f.write_str(&self.family),
        }
    }
}
