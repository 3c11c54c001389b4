use thiserror::Error;

/// Reasons a synthesis request cannot be resolved to a model and language.
///
/// Both variants are caller mistakes; resolving again with the same input
/// always fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unsupported language code: '{0}'")]
    InvalidLanguageCode(String),

    #[error("Unknown model: '{0}'")]
    UnknownModelFamily(String),
}

impl ResolveError {
    /// Name of the request field the error refers to.
    pub fn param(&self) -> &'static str {
        match self {
            ResolveError::InvalidLanguageCode(_) => "language",
            ResolveError::UnknownModelFamily(_) => "model",
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::InvalidLanguageCode(_) => "invalid_language_code",
            ResolveError::UnknownModelFamily(_) => "model_not_found",
        }
    }
}

/// A model family table that the identifier parser could not round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Model family '{id}' ends in language code '{code}' and would parse as a variant")]
    FamilyEndsInLanguageCode { id: String, code: String },
}
