//! Translation catalog loading.
//!
//! A catalog is a directory with one subdirectory per locale. Each locale
//! folder holds JSON files, one per topic, with nested objects of strings:
//!
//! ```text
//! lang/
//!   en/
//!     auth.json        {"failed": "These credentials do not match."}
//!     dashboard.json   {"greeting": "Hello :name", "stats": {"users": "Users"}}
//!   es/
//!     ...
//! ```
//!
//! Loading a locale flattens every file into dotted keys prefixed by the
//! file stem (`auth.failed`, `dashboard.stats.users`) and merges them into a
//! single [`TranslationTable`]. Nothing is cached: every call hits the
//! filesystem again.

use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Flat mapping from dotted translation key to translated string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTable(BTreeMap<String, String>);

impl TranslationTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the translation stored under a dotted key.
    ///
    /// # Arguments
    /// * `key` - Full dotted key, e.g. `auth.failed`
    ///
    /// # Returns
    /// The stored string (possibly empty), or `None` when the key is absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Insert a translation, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TranslationTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Errors that can occur while reading a locale folder.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to walk catalog directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in catalog file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Catalog file {path} must contain a JSON object at the top level")]
    NotAnObject { path: PathBuf },
}

/// Filesystem-backed translation catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
    fallback: Option<Language>,
}

impl Catalog {
    /// Create a catalog rooted at `root` (the directory holding locale folders).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    /// Load `fallback` instead whenever a requested locale has no folder.
    pub fn with_fallback(mut self, fallback: Option<Language>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Directory holding the per-locale folders.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding the catalog files for `locale`.
    pub fn locale_dir(&self, locale: Language) -> PathBuf {
        self.root.join(locale.code())
    }

    /// Load and flatten every catalog file for `locale`.
    ///
    /// A missing locale folder is not an error: the result is an empty
    /// table (or the fallback locale's table, when one is configured).
    pub fn load(&self, locale: Language) -> Result<TranslationTable, CatalogError> {
        let dir = self.locale_dir(locale);
        if dir.is_dir() {
            return load_dir(&dir);
        }

        match self.fallback {
            Some(fallback) if fallback != locale => {
                let fallback_dir = self.locale_dir(fallback);
                if fallback_dir.is_dir() {
                    debug!(
                        "No catalog folder for '{}', using fallback '{}'",
                        locale, fallback
                    );
                    return load_dir(&fallback_dir);
                }
                Ok(TranslationTable::new())
            }
            _ => Ok(TranslationTable::new()),
        }
    }

    /// Load the table for `locale`, degrading to an empty table on any error.
    pub fn translations_for(&self, locale: Language) -> TranslationTable {
        match self.load(locale) {
            Ok(table) => {
                debug!("Loaded {} translation keys for '{}'", table.len(), locale);
                table
            }
            Err(e) => {
                warn!("Failed to load translations for '{}': {}", locale, e);
                TranslationTable::new()
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn load_dir(dir: &Path) -> Result<TranslationTable, CatalogError> {
    let mut table = TranslationTable::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            debug!("Skipping non-JSON catalog file {}", path.display());
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            debug!("Skipping catalog file with non UTF-8 name {}", path.display());
            continue;
        };

        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if !value.is_object() {
            return Err(CatalogError::NotAnObject {
                path: path.to_path_buf(),
            });
        }

        flatten_into(&mut table, stem, &value);
    }

    Ok(table)
}

/// Flatten a nested JSON value into dotted keys under `prefix`.
///
/// Arrays use their index as the key segment. Nulls and empty containers
/// contribute nothing.
fn flatten_into(table: &mut TranslationTable, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten_into(table, &format!("{}.{}", prefix, key), nested);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_into(table, &format!("{}.{}", prefix, index), nested);
            }
        }
        Value::String(s) => insert_leaf(table, prefix, s.clone()),
        Value::Number(n) => insert_leaf(table, prefix, n.to_string()),
        Value::Bool(b) => insert_leaf(table, prefix, b.to_string()),
        Value::Null => {}
    }
}

fn insert_leaf(table: &mut TranslationTable, key: &str, value: String) {
    if table.insert(key, value).is_some() {
        debug!("Translation key '{}' overwritten by a later catalog file", key);
    }
}
