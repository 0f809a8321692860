/*!
 * Read-only site data tables.
 *
 * Two external JSON tables feed the link rewriter: the symbol
 * cross-reference table (glossary ids to per-language slugs) and the
 * localized UI-string table (static chrome: nav anchors, footer slugs).
 */

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::file_utils::FileManager;

/// Per-language record of one symbol in the source table
#[derive(Debug, Deserialize)]
struct SymbolLocale {
    #[serde(default)]
    slug: Option<String>,
}

/// Source file shape of the symbol table
#[derive(Debug, Deserialize)]
struct SymbolFile {
    #[serde(default)]
    symbols: Vec<BTreeMap<String, SymbolLocale>>,
}

/// Cross-reference table: symbol id → language → slug
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, BTreeMap<String, String>>,
}

impl SymbolTable {
    /// Load the table, keyed by the default-language slug.
    ///
    /// A missing file yields an empty table: sites without a glossary
    /// section simply have nothing to cross-reference.
    pub fn load<P: AsRef<Path>>(path: P, default_language: &str) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            warn!("Symbol table not found at {:?}, using empty table", path);
            return Ok(Self::default());
        }

        let content = FileManager::read_to_string(path)?;
        let file: SymbolFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse symbol table: {:?}", path))?;

        let mut entries = BTreeMap::new();
        for symbol in file.symbols {
            let Some(id) = symbol
                .get(default_language)
                .and_then(|locale| locale.slug.clone())
            else {
                continue;
            };
            let slugs: BTreeMap<String, String> = symbol
                .into_iter()
                .filter(|(lang, _)| lang != default_language)
                .filter_map(|(lang, locale)| locale.slug.map(|slug| (lang, slug)))
                .collect();
            entries.insert(id, slugs);
        }
        Ok(Self { entries })
    }

    /// Whether a symbol id exists in the table
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Localized slug for a symbol id
    pub fn lookup(&self, id: &str, lang: &str) -> Option<&str> {
        self.entries
            .get(id)
            .and_then(|slugs| slugs.get(lang))
            .map(|s| s.as_str())
    }

    /// Number of symbols in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Localized strings for static chrome: `lang → field → string`
#[derive(Debug, Clone, Default)]
pub struct UiStrings {
    languages: BTreeMap<String, BTreeMap<String, String>>,
}

impl UiStrings {
    /// Load the table; a missing file yields an empty table
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            warn!("UI-string table not found at {:?}, using empty table", path);
            return Ok(Self::default());
        }

        let content = FileManager::read_to_string(path)?;
        let languages: BTreeMap<String, BTreeMap<String, String>> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse UI-string table: {:?}", path))?;
        Ok(Self { languages })
    }

    /// Localized string for a named field
    pub fn get(&self, lang: &str, field: &str) -> Option<&str> {
        self.languages
            .get(lang)
            .and_then(|fields| fields.get(field))
            .map(|s| s.as_str())
    }

    /// The values a field takes across every language.
    ///
    /// Used to recognize already-localized chrome when reprocessing
    /// generated documents.
    pub fn values(&self, field: &str) -> Vec<&str> {
        self.languages
            .values()
            .filter_map(|fields| fields.get(field))
            .map(|s| s.as_str())
            .collect()
    }
}
