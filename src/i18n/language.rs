//! Language type: the closed set of supported languages.
//!
//! Every language code that circulates through the application is a
//! `Language`. Raw strings coming from sessions or forms are turned into one
//! through [`Language::from_code`], which never fails loudly: unknown codes
//! simply produce `None` so callers can fall back to a default.

use crate::i18n::I18nError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A supported language.
///
/// The variant order is the order languages are offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// English
    En,
    /// Spanish
    Es,
    /// Italian
    It,
    /// Portuguese
    Pt,
}

impl Language {
    /// All supported languages, in display order.
    pub const ALL: [Language; 4] = [Language::En, Language::Es, Language::It, Language::Pt];

    /// Look up a language by its ISO 639-1 code.
    ///
    /// The match is exact and case-sensitive; codes must match the catalog
    /// folder names.
    ///
    /// # Example
    /// ```
    /// use locale_switch::i18n::Language;
    ///
    /// assert_eq!(Language::from_code("es"), Some(Language::Es));
    /// assert_eq!(Language::from_code("xx"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Language> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }

    /// Get the ISO 639-1 language code (e.g., "en", "es").
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::It => "it",
            Language::Pt => "pt",
        }
    }

    /// Get the language name in its own language, as shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Es => "Español",
            Language::It => "Italiano",
            Language::Pt => "Português",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| I18nError::InvalidCode(s.to_string()))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== from_code Tests ====================

    #[test]
    fn test_from_code_all_supported() {
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code("es"), Some(Language::Es));
        assert_eq!(Language::from_code("it"), Some(Language::It));
        assert_eq!(Language::from_code("pt"), Some(Language::Pt));
    }

    #[test]
    fn test_from_code_unknown() {
        assert_eq!(Language::from_code("fr"), None);
        assert_eq!(Language::from_code("xx"), None);
    }

    #[test]
    fn test_from_code_empty() {
        assert_eq!(Language::from_code(""), None);
    }

    #[test]
    fn test_from_code_is_case_sensitive() {
        assert_eq!(Language::from_code("EN"), None);
        assert_eq!(Language::from_code("Es"), None);
    }

    #[test]
    fn test_from_code_does_not_trim() {
        assert_eq!(Language::from_code(" es"), None);
        assert_eq!(Language::from_code("es\n"), None);
    }

    // ==================== Label Tests ====================

    #[test]
    fn test_labels_are_native_names() {
        assert_eq!(Language::En.label(), "English");
        assert_eq!(Language::Es.label(), "Español");
        assert_eq!(Language::It.label(), "Italiano");
        assert_eq!(Language::Pt.label(), "Português");
    }

    #[test]
    fn test_all_roundtrips_through_code() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    // ==================== Trait Tests ====================

    #[test]
    fn test_from_str_invalid_code() {
        let err = "klingon".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("klingon"));
    }

    #[test]
    fn test_from_str_valid_code() {
        let lang: Language = "pt".parse().expect("Should parse");
        assert_eq!(lang, Language::Pt);
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::It.to_string(), "it");
    }

    #[test]
    fn test_serializes_as_code() {
        let json = serde_json::to_string(&Language::Es).unwrap();
        assert_eq!(json, "\"es\"");
    }
}
