//! Shared page data handed to the rendering layer on every request.
//!
//! The payload serializes as:
//!
//! ```json
//! {
//!   "language": "es",
//!   "languages": [{"value": "en", "label": "English"}, ...],
//!   "translations": {"auth.failed": "...", ...}
//! }
//! ```
//!
//! `translations` is deferred: the catalog is only read when the payload
//! is actually serialized (or explicitly resolved).

use crate::i18n::{Catalog, Language, LanguageEntry, LanguageRegistry, TranslationTable};
use crate::locale::EffectiveLocale;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A value produced on demand by a zero-argument function.
pub struct Deferred<T> {
    producer: Box<dyn Fn() -> T + Send + Sync>,
}

impl<T> Deferred<T> {
    pub fn new(producer: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            producer: Box::new(producer),
        }
    }

    /// Run the producer. Each call computes the value again.
    pub fn resolve(&self) -> T {
        (self.producer)()
    }
}

impl<T: Serialize> Serialize for Deferred<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.resolve().serialize(serializer)
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// One option of the language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub value: Language,
    pub label: &'static str,
}

impl From<&LanguageEntry> for LanguageOption {
    fn from(entry: &LanguageEntry) -> Self {
        Self {
            value: entry.code,
            label: entry.label,
        }
    }
}

/// Locale data shared with every rendered page.
#[derive(Debug, Serialize)]
pub struct SharedProps {
    pub language: Language,
    pub languages: Vec<LanguageOption>,
    pub translations: Deferred<TranslationTable>,
}

impl SharedProps {
    /// Gather the locale payload for a request whose locale is already resolved.
    pub fn assemble(locale: EffectiveLocale, catalog: Arc<Catalog>) -> Self {
        let language = locale.language();
        Self {
            language,
            languages: LanguageRegistry::get()
                .all_languages()
                .iter()
                .map(LanguageOption::from)
                .collect(),
            translations: Deferred::new(move || catalog.translations_for(language)),
        }
    }
}
