/*!
 * Persistent slug registry.
 *
 * Maps every article key (its source-language slug, or the "index" sentinel
 * for the blog root) to the URL slug of each language variant. The registry
 * is built once by the `extract` command and read-only afterwards.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::app_config::Config;
use crate::document::{unescape, Document};
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::translation::TranslationService;

/// Article key of the blog root; its slug is empty in every language
pub const ROOT_KEY: &str = "index";

/// Version stamp of the persisted registry format
const FORMAT_VERSION: u32 = 1;

// @const: Slug separator normalization regex
static NON_ALNUM_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Persisted registry file shape
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(rename = "formatVersion")]
    format_version: u32,

    #[serde(rename = "defaultLanguage")]
    default_language: String,

    articles: BTreeMap<String, ArticleRecord>,
}

/// One persisted article entry
#[derive(Debug, Serialize, Deserialize)]
struct ArticleRecord {
    slugs: BTreeMap<String, String>,
}

/// Mapping from article keys to per-language slugs
#[derive(Debug, Clone)]
pub struct SlugRegistry {
    default_language: String,
    articles: BTreeMap<String, BTreeMap<String, String>>,
}

impl SlugRegistry {
    /// Create an empty registry
    pub fn new(default_language: &str) -> Self {
        Self {
            default_language: default_language.to_string(),
            articles: BTreeMap::new(),
        }
    }

    /// Build the registry from the source-language corpus.
    ///
    /// Known slugs are seeded from each document's alternate-link metadata;
    /// languages still missing a slug get one derived from the translated
    /// title, unique within the language.
    pub async fn extract(config: &Config, service: &TranslationService) -> Result<Self> {
        let mut registry = Self::new(&config.default_language);
        let source_dir = config.blog_dir(&config.default_language);
        let files = FileManager::list_documents(&source_dir)?;
        info!(
            "Extracting slugs from {} source documents in {:?}",
            files.len(),
            source_dir
        );

        // Pass 1: seed from existing alternate links, remember titles.
        let mut titles: BTreeMap<String, String> = BTreeMap::new();
        for file in &files {
            let key = FileManager::article_key(file);
            let html = FileManager::read_to_string(file)?;
            let doc = Document::parse(&html);

            registry.insert(&key, &config.default_language, default_slug(&key));
            for link in doc.find_all_by_tag(doc.root(), "link") {
                if doc.attr(link, "rel") != Some("alternate") {
                    continue;
                }
                let (Some(hreflang), Some(href)) = (doc.attr(link, "hreflang"), doc.attr(link, "href"))
                else {
                    continue;
                };
                if hreflang == "x-default" {
                    continue;
                }
                if let Some((lang, slug)) = config.slug_from_url(href) {
                    registry.insert(&key, &lang, &slug);
                }
            }

            if key != ROOT_KEY {
                let h1 = doc.find_by_tag(doc.root(), "h1").ok_or_else(|| {
                    PipelineError::MalformedSource {
                        path: file.clone(),
                        reason: "no <h1> title heading".to_string(),
                    }
                })?;
                titles.insert(key.clone(), clean_title(&doc.text_content(h1)));
            }
        }

        // The root maps to an empty slug everywhere.
        for profile in &config.languages {
            registry.insert(ROOT_KEY, &profile.code, "");
        }

        // Pass 2: derive missing slugs from translated titles.
        for profile in &config.languages {
            let mut used: BTreeSet<String> = registry
                .articles
                .values()
                .filter_map(|slugs| slugs.get(&profile.code))
                .filter(|slug| !slug.is_empty())
                .cloned()
                .collect();

            let pending: Vec<String> = titles
                .keys()
                .filter(|key| registry.get(key, &profile.code).is_none())
                .cloned()
                .collect();
            for key in pending {
                let title = &titles[&key];
                let translated = service
                    .translate_text(title, &config.default_language, &profile.code)
                    .await?;
                let mut candidate = slugify(&translated);
                if candidate.is_empty() {
                    candidate = slugify(title);
                }
                let slug = disambiguate(&candidate, &used);
                debug!("Derived slug '{}' for '{}' ({})", slug, key, profile.code);
                used.insert(slug.clone());
                registry.insert(&key, &profile.code, &slug);
            }
        }

        Ok(registry)
    }

    /// Load the registry from its persisted JSON form
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let file: RegistryFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse slug registry: {:?}", path.as_ref()))?;
        Ok(Self {
            default_language: file.default_language,
            articles: file
                .articles
                .into_iter()
                .map(|(key, record)| (key, record.slugs))
                .collect(),
        })
    }

    /// Persist the registry; output is byte-stable for unchanged content
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        FileManager::write_to_file(path, &self.to_json())
    }

    /// Stable JSON rendering of the registry
    pub fn to_json(&self) -> String {
        let file = RegistryFile {
            format_version: FORMAT_VERSION,
            default_language: self.default_language.clone(),
            articles: self
                .articles
                .iter()
                .map(|(key, slugs)| (key.clone(), ArticleRecord { slugs: slugs.clone() }))
                .collect(),
        };
        let mut json = serde_json::to_string_pretty(&file).expect("registry serialization is infallible");
        json.push('\n');
        json
    }

    /// Slug for an article in a language, empty string when unknown.
    ///
    /// The root sentinel always yields the empty slug.
    pub fn lookup(&self, key: &str, lang: &str) -> &str {
        if key == ROOT_KEY {
            return "";
        }
        self.get(key, lang).unwrap_or("")
    }

    /// Slug for an article in a language, if recorded
    pub fn get(&self, key: &str, lang: &str) -> Option<&str> {
        self.articles
            .get(key)
            .and_then(|slugs| slugs.get(lang))
            .map(|s| s.as_str())
    }

    /// Record a slug
    pub fn insert(&mut self, key: &str, lang: &str, slug: &str) {
        self.articles
            .entry(key.to_string())
            .or_default()
            .insert(lang.to_string(), slug.to_string());
    }

    /// Whether an article key is known
    pub fn contains(&self, key: &str) -> bool {
        self.articles.contains_key(key)
    }

    /// All article keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.articles.keys()
    }

    /// Number of registered articles
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Whether the registry has no articles
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Source language the keys are expressed in
    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}

fn default_slug(key: &str) -> &str {
    if key == ROOT_KEY {
        ""
    } else {
        key
    }
}

/// Append `-2`, `-3`, … until the candidate is unique within the language
fn disambiguate(candidate: &str, used: &BTreeSet<String>) -> String {
    if !used.contains(candidate) {
        return candidate.to_string();
    }
    let mut counter = 2;
    loop {
        let suffixed = format!("{}-{}", candidate, counter);
        if !used.contains(&suffixed) {
            return suffixed;
        }
        counter += 1;
    }
}

/// Normalize a title into a URL-safe slug.
///
/// Case-folds, transliterates German umlauts and ß, strips the Latin
/// diacritics that occur in the supported languages, collapses remaining
/// non-alphanumeric runs to single dashes and trims them from the ends.
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        match ch {
            'ä' => folded.push_str("ae"),
            'ö' => folded.push_str("oe"),
            'ü' => folded.push_str("ue"),
            'ß' => folded.push_str("ss"),
            'à' | 'á' | 'â' | 'ã' | 'å' => folded.push('a'),
            'è' | 'é' | 'ê' | 'ë' => folded.push('e'),
            'ì' | 'í' | 'î' | 'ï' => folded.push('i'),
            'ò' | 'ó' | 'ô' | 'õ' => folded.push('o'),
            'ù' | 'ú' | 'û' => folded.push('u'),
            'ç' => folded.push('c'),
            'ñ' => folded.push('n'),
            'œ' => folded.push_str("oe"),
            'æ' => folded.push_str("ae"),
            _ => folded.push(ch),
        }
    }
    NON_ALNUM_RUN
        .replace_all(&folded, "-")
        .trim_matches('-')
        .to_string()
}

/// Collapse whitespace runs and decode entities in an extracted title
fn clean_title(raw: &str) -> String {
    unescape(raw).split_whitespace().collect::<Vec<_>>().join(" ")
}
