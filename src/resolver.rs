//! Effective-language resolution for synthesis requests.
//!
//! A language-specific model variant (`chatterbox-multilingual-es`) pins the
//! language: whatever the caller sends in the `language` field is ignored and
//! not even validated. Without a variant suffix the explicit language is
//! used, falling back to the configured default.

use serde::Serialize;
use tracing::debug;

use crate::error::ResolveError;
use crate::i18n::{Language, LanguageRegistry};
use crate::model::{ModelIdentifier, ModelRegistry};

/// Where the effective language came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageSource {
    Model,
    Explicit,
    Default,
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub effective_language: Language,
    pub model_family: String,
    pub language_source: LanguageSource,
}

/// Pure resolver over read-only language and model tables.
#[derive(Debug, Clone, Copy)]
pub struct LanguageResolver<'a> {
    languages: &'a LanguageRegistry,
    models: &'a ModelRegistry,
    default_language: Language,
}

impl<'a> LanguageResolver<'a> {
    pub fn new(
        languages: &'a LanguageRegistry,
        models: &'a ModelRegistry,
        default_language: Language,
    ) -> Self {
        Self {
            languages,
            models,
            default_language,
        }
    }

    /// Resolve the effective language and model family.
    ///
    /// # Errors
    /// * `UnknownModelFamily` if the family part of `model` is not registered
    ///   (checked first)
    /// * `InvalidLanguageCode` if `explicit_language` is consulted and is not
    ///   an enabled code
    pub fn resolve(
        &self,
        model: &str,
        explicit_language: Option<&str>,
    ) -> Result<ResolvedConfig, ResolveError> {
        let identifier = ModelIdentifier::parse(model, self.languages);
        self.resolve_identifier(identifier, explicit_language)
    }

    /// Same as [`resolve`](Self::resolve) for an already parsed identifier.
    pub fn resolve_identifier(
        &self,
        identifier: ModelIdentifier,
        explicit_language: Option<&str>,
    ) -> Result<ResolvedConfig, ResolveError> {
        if !self.models.contains(&identifier.family) {
            return Err(ResolveError::UnknownModelFamily(identifier.to_string()));
        }

        let (effective_language, language_source) = match identifier.language {
            Some(language) => {
                if let Some(ignored) = explicit_language {
                    debug!(
                        "Model {} pins language {}, ignoring requested '{}'",
                        identifier, language, ignored
                    );
                }
                (language, LanguageSource::Model)
            }
            None => match normalize(explicit_language) {
                Some(code) => {
                    let language = self
                        .languages
                        .language(&code)
                        .ok_or(ResolveError::InvalidLanguageCode(code))?;
                    (language, LanguageSource::Explicit)
                }
                None => (self.default_language, LanguageSource::Default),
            },
        };

        Ok(ResolvedConfig {
            effective_language,
            model_family: identifier.family,
            language_source,
        })
    }
}

/// Trim and lowercase a caller-supplied code; blank counts as absent.
fn normalize(explicit_language: Option<&str>) -> Option<String> {
    explicit_language
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_ascii_lowercase)
}
