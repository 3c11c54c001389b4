//! Model family registry.
//!
//! A family is the base model name without any language suffix. Families may
//! themselves contain hyphens (`chatterbox-multilingual`), which is why the
//! identifier parser only strips a trailing segment that is a registered
//! language code.

use std::sync::OnceLock;

use crate::error::RegistryError;
use crate::i18n::LanguageRegistry;

/// A registered synthesis model family.
#[derive(Debug, Clone)]
pub struct ModelFamily {
    /// Family identifier, e.g. "chatterbox-multilingual"
    pub id: &'static str,

    /// Human readable description used in the model listing
    pub description: &'static str,

    /// Whether the catalog publishes one `<family>-<code>` variant per enabled language
    pub language_variants: bool,

    /// Owner reported in the OpenAI-style listing
    pub owned_by: &'static str,
}

/// Immutable table of registered model families.
#[derive(Debug)]
pub struct ModelRegistry {
    families: Vec<ModelFamily>,
}

static REGISTRY: OnceLock<ModelRegistry> = OnceLock::new();

impl ModelRegistry {
    /// Get the global model registry instance.
    pub fn get() -> &'static ModelRegistry {
        REGISTRY.get_or_init(|| {
            ModelRegistry::from_families(default_families(), LanguageRegistry::get())
                .expect("Built-in model families should not end in a language code")
        })
    }

    /// Build a registry, checking every family id against `languages`.
    ///
    /// # Errors
    /// Fails if a family id ends in `-<code>` for any registered code (enabled
    /// or not), since that id would parse as a language variant of a shorter
    /// family and could never resolve as published.
    pub fn from_families(
        families: Vec<ModelFamily>,
        languages: &LanguageRegistry,
    ) -> Result<Self, RegistryError> {
        for family in &families {
            if let Some((_, suffix)) = family.id.rsplit_once('-') {
                if languages.get_by_code(suffix).is_some() {
                    return Err(RegistryError::FamilyEndsInLanguageCode {
                        id: family.id.to_string(),
                        code: suffix.to_string(),
                    });
                }
            }
        }

        Ok(Self { families })
    }

    /// Find a family by its exact id.
    pub fn get_by_id(&self, id: &str) -> Option<&ModelFamily> {
        self.families.iter().find(|family| family.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_by_id(id).is_some()
    }

    pub fn list(&self) -> &[ModelFamily] {
        &self.families
    }
}

fn default_families() -> Vec<ModelFamily> {
    vec![
        ModelFamily {
            id: "chatterbox",
            description: "Chatterbox TTS",
            language_variants: false,
            owned_by: "resemble-ai",
        },
        ModelFamily {
            id: "chatterbox-multilingual",
            description: "Chatterbox Multilingual",
            language_variants: true,
            owned_by: "resemble-ai",
        },
        ModelFamily {
            id: "tts-1",
            description: "OpenAI-compatible alias for Chatterbox TTS",
            language_variants: false,
            owned_by: "openai-compat",
        },
        ModelFamily {
            id: "tts-1-hd",
            description: "OpenAI-compatible alias for Chatterbox TTS (high quality)",
            language_variants: false,
            owned_by: "openai-compat",
        },
    ]
}
