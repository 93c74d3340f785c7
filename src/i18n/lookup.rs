//! Translation lookup with placeholder substitution.
//!
//! Placeholders are written `:name` inside a translation string. Each
//! replacement substitutes the first occurrence of its token, literally.
//! Tokens with no matching replacement are left in the output as-is.

use crate::i18n::TranslationTable;

/// Resolve `key` against `table` and apply `replacements` in order.
///
/// A key that is missing, or that maps to an empty string, resolves to the
/// key itself.
///
/// # Example
/// ```
/// use locale_switch::i18n::{lookup, TranslationTable};
///
/// let table: TranslationTable = [("dashboard.greeting", "Hello :name")].into_iter().collect();
/// assert_eq!(lookup(&table, "dashboard.greeting", [("name", "Ana")]), "Hello Ana");
/// assert_eq!(lookup(&table, "no.such.key", [("name", "Ana")]), "no.such.key");
/// ```
pub fn lookup<I, K, V>(table: &TranslationTable, key: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut translation = match table.get(key) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => key.to_string(),
    };

    for (name, value) in replacements {
        let token = format!(":{}", name.as_ref());
        translation = translation.replacen(&token, value.as_ref(), 1);
    }

    translation
}

/// Borrowing wrapper for repeated lookups against one table.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    table: &'a TranslationTable,
}

impl<'a> Translator<'a> {
    /// Wrap `table` for lookups; the table is borrowed, not copied.
    pub fn new(table: &'a TranslationTable) -> Self {
        Self { table }
    }

    /// Resolve a key with no replacements.
    pub fn get(&self, key: &str) -> String {
        lookup(self.table, key, std::iter::empty::<(&str, &str)>())
    }

    /// Resolve a key and apply placeholder replacements.
    ///
    /// # Arguments
    /// * `key` - Dotted translation key
    /// * `replacements` - `(name, value)` pairs, applied in order to `:name` tokens
    ///
    /// # Returns
    /// The resolved string, or `key` itself when the table has no usable entry
    pub fn get_with<I, K, V>(&self, key: &str, replacements: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        lookup(self.table, key, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn table() -> TranslationTable {
        [
            ("dashboard.greeting", "Hello :name"),
            ("dashboard.welcome", "Welcome back, :name! You have :count new messages."),
            ("dashboard.echo", ":name and :name"),
            ("dashboard.prefix", ":names vs :name"),
            ("time.clock", "Starts at 10:30"),
            ("blank", ""),
        ]
        .into_iter()
        .collect()
    }

    // ==================== Resolution Tests ====================

    #[test]
    fn test_lookup_existing_key() {
        let t = table();
        let translator = Translator::new(&t);
        assert_eq!(translator.get("dashboard.greeting"), "Hello :name");
    }

    #[test]
    fn test_lookup_missing_key_returns_key() {
        let t = table();
        let translator = Translator::new(&t);
        assert_eq!(translator.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_lookup_empty_translation_returns_key() {
        let t = table();
        let translator = Translator::new(&t);
        assert_eq!(translator.get("blank"), "blank");
    }

    #[test]
    fn test_lookup_in_empty_table() {
        let empty = TranslationTable::new();
        assert_eq!(lookup(&empty, "auth.failed", [("name", "Ana")]), "auth.failed");
    }

    // ==================== Placeholder Tests ====================

    #[test]
    fn test_single_replacement() {
        let t = table();
        assert_eq!(lookup(&t, "dashboard.greeting", [("name", "Ana")]), "Hello Ana");
    }

    #[test]
    fn test_multiple_replacements_from_map() {
        let t = table();
        let replacements = HashMap::from([("name", "Ana"), ("count", "3")]);
        assert_eq!(
            lookup(&t, "dashboard.welcome", &replacements),
            "Welcome back, Ana! You have 3 new messages."
        );
    }

    #[test]
    fn test_unmatched_placeholder_left_verbatim() {
        let t = table();
        assert_eq!(lookup(&t, "dashboard.greeting", [("other", "x")]), "Hello :name");
    }

    #[test]
    fn test_only_first_occurrence_replaced() {
        let t = table();
        assert_eq!(lookup(&t, "dashboard.echo", [("name", "Ana")]), "Ana and :name");
    }

    #[test]
    fn test_replacement_order_matters_for_prefixes() {
        let t = table();
        // ":name" matches inside ":names" first
        assert_eq!(
            lookup(&t, "dashboard.prefix", [("name", "A"), ("names", "B")]),
            "As vs :name"
        );
        assert_eq!(
            lookup(&t, "dashboard.prefix", [("names", "B"), ("name", "A")]),
            "B vs A"
        );
    }

    #[test]
    fn test_colon_without_replacement_untouched() {
        let t = table();
        let translator = Translator::new(&t);
        assert_eq!(translator.get("time.clock"), "Starts at 10:30");
    }

    #[test]
    fn test_replacements_apply_to_fallback_key() {
        let t = table();
        assert_eq!(lookup(&t, "greet.:name", [("name", "Ana")]), "greet.Ana");
    }

    #[test]
    fn test_translator_get_with() {
        let t = table();
        let translator = Translator::new(&t);
        assert_eq!(
            translator.get_with("dashboard.greeting", vec![("name".to_string(), "Rui".to_string())]),
            "Hello Rui"
        );
    }

    proptest! {
        #[test]
        fn prop_missing_key_resolves_to_itself(key in "[a-z.]{1,20}") {
            let empty = TranslationTable::new();
            prop_assert_eq!(lookup(&empty, &key, std::iter::empty::<(&str, &str)>()), key);
        }
    }
}
