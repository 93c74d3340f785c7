//! The visitor's chosen language, as stored in their session.

use crate::i18n::Language;
use crate::session::Session;

/// Session key under which the chosen language code is kept.
pub const LANGUAGE_KEY: &str = "language";

/// Read/write access to the `language` slot of one session.
///
/// No validation happens here: `get` returns whatever raw code is stored,
/// and `set` only accepts an already-validated [`Language`].
#[derive(Debug, Clone, Copy)]
pub struct PreferenceStore<'a> {
    session: &'a Session,
}

impl<'a> PreferenceStore<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// The stored language code, if one has ever been chosen.
    pub fn get(&self) -> Option<String> {
        self.session.get(LANGUAGE_KEY)
    }

    pub fn set(&self, language: Language) {
        self.session.insert(LANGUAGE_KEY, language.code());
    }
}
