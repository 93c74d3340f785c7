//! Internationalization (i18n) module for locale selection.
//!
//! # Architecture
//!
//! - `language`: The closed `Language` enum and its total code lookup
//! - `registry`: Ordered list of supported languages with display labels
//! - `catalog`: Loads per-locale translation files into a flat `TranslationTable`
//! - `lookup`: Key resolution with `:placeholder` substitution
//!
//! # Example
//!
//! ```rust,ignore
//! use locale_switch::i18n::{Language, LanguageRegistry, lookup};
//!
//! let spanish = Language::from_code("es");
//! let entries = LanguageRegistry::get().all_languages();
//! let greeting = lookup(&table, "dashboard.greeting", [("name", "Ana")]);
//! ```

mod catalog;
mod language;
mod lookup;
mod registry;

pub use catalog::{Catalog, CatalogError, TranslationTable};
pub use language::Language;
pub use lookup::{lookup, Translator};
pub use registry::{LanguageEntry, LanguageRegistry};

use thiserror::Error;

/// Errors raised by strict language lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum I18nError {
    #[error("Unknown language code: '{0}'")]
    InvalidCode(String),
}
