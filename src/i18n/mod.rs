//! Language support: the registered language table and the validated
//! `Language` handle built from it.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for all synthesis languages and their metadata
//! - `language`: Type-safe Language handle that can only come from a registry lookup
//!
//! # Example
//!
//! ```rust,ignore
//! use tts_language_router::i18n::{Language, LanguageRegistry};
//!
//! let spanish = LanguageRegistry::get().language("es").expect("registered");
//! let fallback = Language::fallback();
//! ```

mod language;
mod registry;

pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
