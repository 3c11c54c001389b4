//! Model families, identifier parsing and the published model catalog.

mod catalog;
mod family;
mod identifier;

pub use catalog::{filter_by_suffixes, ModelCatalog, ModelEntry};
pub use family::{ModelFamily, ModelRegistry};
pub use identifier::ModelIdentifier;
