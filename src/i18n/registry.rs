//! Language registry: Single source of truth for all synthesis languages.
//!
//! The built-in table mirrors the languages the multilingual engine can speak.
//! It is initialized once on first access through `OnceLock` and never mutated,
//! so it can be shared by reference across every request handler.

use std::sync::OnceLock;

use crate::i18n::Language;

/// Configuration for a registered language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "es", "zh")
    pub code: &'static str,

    /// English name of the language (e.g., "Spanish")
    pub name: &'static str,

    /// Native name of the language (e.g., "Español")
    pub native_name: &'static str,

    /// Whether this is the fallback language when nothing else is configured
    /// (exactly one entry should set this)
    pub is_default_fallback: bool,

    /// Whether this language is accepted in requests and published in the catalog
    pub enabled: bool,
}

/// Immutable table of registered languages.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::from_configs(default_languages()))
    }

    /// Build a registry from an explicit table.
    ///
    /// Used by tests and by callers that want a restricted language set.
    pub fn from_configs(languages: Vec<LanguageConfig>) -> Self {
        Self { languages }
    }

    /// Get a language configuration by its code, enabled or not.
    ///
    /// Matching is exact: codes are registered in lowercase.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Look up an enabled language and return its validated handle.
    ///
    /// # Returns
    /// * `Some(Language)` if the code is registered and enabled
    /// * `None` otherwise
    pub fn language(&self, code: &str) -> Option<Language> {
        self.get_by_code(code)
            .filter(|config| config.enabled)
            .map(Language::from_config)
    }

    /// Get all enabled languages, in table order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Get all languages (including disabled ones).
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the fallback language configuration.
    ///
    /// # Panics
    /// Panics if the table has no fallback entry or more than one. Both are
    /// programming errors in the registry table, not runtime conditions.
    pub fn fallback(&self) -> &LanguageConfig {
        let fallbacks: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback language found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback languages found in registry"),
        }
    }

    /// Check if a language code is registered and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code)
            .map(|lang| lang.enabled)
            .unwrap_or(false)
    }
}

const fn lang(code: &'static str, name: &'static str, native_name: &'static str) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        native_name,
        is_default_fallback: false,
        enabled: true,
    }
}

/// Built-in language table, sorted by code.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        lang("ar", "Arabic", "العربية"),
        lang("da", "Danish", "Dansk"),
        lang("de", "German", "Deutsch"),
        lang("el", "Greek", "Ελληνικά"),
        LanguageConfig {
            is_default_fallback: true,
            ..lang("en", "English", "English")
        },
        lang("es", "Spanish", "Español"),
        lang("fi", "Finnish", "Suomi"),
        lang("fr", "French", "Français"),
        lang("he", "Hebrew", "עברית"),
        lang("hi", "Hindi", "हिन्दी"),
        lang("it", "Italian", "Italiano"),
        lang("ja", "Japanese", "日本語"),
        lang("ko", "Korean", "한국어"),
        lang("ms", "Malay", "Bahasa Melayu"),
        lang("nl", "Dutch", "Nederlands"),
        lang("no", "Norwegian", "Norsk"),
        lang("pl", "Polish", "Polski"),
        lang("pt", "Portuguese", "Português"),
        lang("ru", "Russian", "Русский"),
        lang("sv", "Swedish", "Svenska"),
        lang("sw", "Swahili", "Kiswahili"),
        lang("tr", "Turkish", "Türkçe"),
        lang("zh", "Chinese", "中文"),
    ]
}
