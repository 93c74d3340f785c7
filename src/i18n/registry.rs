//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is built once from [`Language::ALL`] and shared through a
//! `OnceLock` singleton. It is what the language selector is populated from
//! and what every incoming code is validated against.

use crate::i18n::{I18nError, Language};
use std::sync::OnceLock;

/// A supported language paired with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageEntry {
    /// The language itself (serializes as its code)
    pub code: Language,

    /// Native name of the language (e.g., "Español")
    pub label: &'static str,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageEntry>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: Language::ALL
                .into_iter()
                .map(|code| LanguageEntry {
                    code,
                    label: code.label(),
                })
                .collect(),
        })
    }

    /// All supported languages, in selector order.
    pub fn all_languages(&self) -> &[LanguageEntry] {
        &self.languages
    }

    /// Get a registry entry by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageEntry)` if the code is supported
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageEntry> {
        self.languages.iter().find(|entry| entry.code.code() == code)
    }

    /// Check whether a code belongs to the supported set.
    pub fn is_valid(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Get the display label for a code.
    ///
    /// # Errors
    /// Returns `I18nError::InvalidCode` if the code is not supported.
    pub fn label(&self, code: &str) -> Result<&'static str, I18nError> {
        self.get_by_code(code)
            .map(|entry| entry.label)
            .ok_or_else(|| I18nError::InvalidCode(code.to_string()))
    }
}
