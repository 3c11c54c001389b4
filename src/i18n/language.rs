//! Language type: a code that has been validated against a registry.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::i18n::{LanguageConfig, LanguageRegistry};

/// A validated, enabled language.
///
/// The only way to obtain one is a registry lookup, so holding a `Language`
/// proves the code was registered and enabled when it was looked up.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "es")
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
}

impl Language {
    pub(crate) fn from_config(config: &LanguageConfig) -> Language {
        Language {
            code: config.code,
            name: config.name,
            native_name: config.native_name,
        }
    }

    /// Resolve a code against the global registry.
    ///
    /// # Example
    /// ```ignore
    /// let spanish = Language::from_code("es").expect("registered");
    /// ```
    pub fn from_code(code: &str) -> Option<Language> {
        LanguageRegistry::get().language(code)
    }

    /// The global registry's fallback language (English).
    pub fn fallback() -> Language {
        Language::from_config(LanguageRegistry::get().fallback())
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// English name of the language (e.g., "Spanish").
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Native name of the language (e.g., "Español").
    pub fn native_name(&self) -> &'static str {
        self.native_name
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Language {}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}
