//! Model catalog: every published model id, as served by `GET /v1/models`.

use serde::Serialize;

use crate::i18n::LanguageRegistry;
use crate::model::ModelRegistry;

/// One entry of the model listing (OpenAI `model` object plus metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub id: String,
    pub object: &'static str,
    pub owned_by: &'static str,
    pub description: String,
    pub family: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'static str>,
}

/// Enumerates registered (family x language) combinations.
///
/// Holds no state of its own; the listing is rebuilt from the registries on
/// every call.
#[derive(Debug, Clone, Copy)]
pub struct ModelCatalog<'a> {
    languages: &'a LanguageRegistry,
    models: &'a ModelRegistry,
}

impl<'a> ModelCatalog<'a> {
    pub fn new(languages: &'a LanguageRegistry, models: &'a ModelRegistry) -> Self {
        Self { languages, models }
    }

    /// List every published model, sorted by id.
    ///
    /// Each family contributes its bare id; families with `language_variants`
    /// also contribute `<family>-<code>` for every enabled language.
    pub fn list_models(&self) -> Vec<ModelEntry> {
        let mut entries = Vec::new();

        for family in self.models.list() {
            entries.push(ModelEntry {
                id: family.id.to_string(),
                object: "model",
                owned_by: family.owned_by,
                description: family.description.to_string(),
                family: family.id,
                language: None,
            });

            if !family.language_variants {
                continue;
            }

            for lang in self.languages.list_enabled() {
                entries.push(ModelEntry {
                    id: format!("{}-{}", family.id, lang.code),
                    object: "model",
                    owned_by: family.owned_by,
                    description: format!(
                        "{} - {} ({})",
                        family.description, lang.name, lang.native_name
                    ),
                    family: family.id,
                    language: Some(lang.code),
                });
            }
        }

        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// Find a single published model by id.
    pub fn find(&self, id: &str) -> Option<ModelEntry> {
        self.list_models().into_iter().find(|entry| entry.id == id)
    }
}

/// Keep entries whose id contains any of `suffixes` as a substring.
///
/// Relative order is preserved. An empty suffix set matches nothing.
pub fn filter_by_suffixes<S: AsRef<str>>(models: Vec<ModelEntry>, suffixes: &[S]) -> Vec<ModelEntry> {
    models
        .into_iter()
        .filter(|entry| suffixes.iter().any(|s| entry.id.contains(s.as_ref())))
        .collect()
}
