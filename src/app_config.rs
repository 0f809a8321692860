use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Site origin, scheme plus host, without a trailing slash
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Source language of the corpus (ISO 639-1)
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Directory holding the per-language document tree
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Directory holding pipeline artifacts (slug registry)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// All supported languages, source language included, in output order
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageProfile>,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Per-language site profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LanguageProfile {
    /// ISO 639-1 language code
    pub code: String,

    /// Locale tag used in og:locale (e.g. "de_DE")
    pub locale: String,

    /// Short label shown in the language selector button (e.g. "DE")
    pub label: String,

    /// Native language name shown in the selector menu (e.g. "Deutsch")
    pub name: String,

    /// URL path segment of the blog section in this language
    #[serde(default = "default_blog_segment")]
    pub blog_dir: String,

    /// URL path segment of the symbol glossary section in this language
    pub symbols_dir: String,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProviderKind {
    /// Google Translate web endpoint
    #[default]
    Google,
    /// Deterministic in-process provider for tests and dry runs
    Mock,
}

impl TranslationProviderKind {
    /// Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::Mock => "Mock",
        }
    }
}

impl std::fmt::Display for TranslationProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

impl std::str::FromStr for TranslationProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProviderKind,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Character budget for one batched translation request
    #[serde(default = "default_max_batch_chars")]
    pub max_batch_chars: usize,

    /// Retry count for transient request failures
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff time in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Delay in milliseconds after each successful request
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProviderKind::default(),
            endpoint: default_endpoint(),
            max_batch_chars: default_max_batch_chars(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_domain() -> String {
    "https://example.com".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_blog_segment() -> String {
    "blog".to_string()
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_max_batch_chars() -> usize {
    2500
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_languages() -> Vec<LanguageProfile> {
    vec![
        LanguageProfile {
            code: "en".to_string(),
            locale: "en_US".to_string(),
            label: "EN".to_string(),
            name: "English".to_string(),
            blog_dir: default_blog_segment(),
            symbols_dir: "symbols".to_string(),
        },
        LanguageProfile {
            code: "fr".to_string(),
            locale: "fr_FR".to_string(),
            label: "FR".to_string(),
            name: "Français".to_string(),
            blog_dir: default_blog_segment(),
            symbols_dir: "symboles".to_string(),
        },
        LanguageProfile {
            code: "es".to_string(),
            locale: "es_ES".to_string(),
            label: "ES".to_string(),
            name: "Español".to_string(),
            blog_dir: default_blog_segment(),
            symbols_dir: "simbolos".to_string(),
        },
        LanguageProfile {
            code: "de".to_string(),
            locale: "de_DE".to_string(),
            label: "DE".to_string(),
            name: "Deutsch".to_string(),
            blog_dir: default_blog_segment(),
            symbols_dir: "traumsymbole".to_string(),
        },
        LanguageProfile {
            code: "it".to_string(),
            locale: "it_IT".to_string(),
            label: "IT".to_string(),
            name: "Italiano".to_string(),
            blog_dir: default_blog_segment(),
            symbols_dir: "simboli".to_string(),
        },
    ]
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content + "\n")
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.domain)
            .with_context(|| format!("Invalid site domain: {}", self.domain))?;
        if self.domain.ends_with('/') {
            return Err(anyhow!("Site domain must not end with a slash: {}", self.domain));
        }

        if self.languages.is_empty() {
            return Err(anyhow!("At least one language profile is required"));
        }
        for profile in &self.languages {
            let _name = crate::language_utils::get_language_name(&profile.code)?;
            if profile.blog_dir.is_empty() || profile.symbols_dir.is_empty() {
                return Err(anyhow!(
                    "Language '{}' must define blog and symbol path segments",
                    profile.code
                ));
            }
        }
        if self.profile(&self.default_language).is_none() {
            return Err(anyhow!(
                "Default language '{}' has no language profile",
                self.default_language
            ));
        }

        if self.translation.max_batch_chars < 200 {
            return Err(anyhow!("Translation batch budget is too small to be useful"));
        }
        if self.translation.retry_count == 0 {
            return Err(anyhow!("Translation retry count must be at least 1"));
        }

        Ok(())
    }

    /// Get the profile for a language code
    pub fn profile(&self, code: &str) -> Option<&LanguageProfile> {
        self.languages.iter().find(|p| p.code == code)
    }

    /// All languages except the corpus source language
    pub fn target_languages(&self) -> Vec<&LanguageProfile> {
        self.languages
            .iter()
            .filter(|p| p.code != self.default_language)
            .collect()
    }

    /// Absolute URL of an article in a given language
    ///
    /// An empty slug addresses the blog index page.
    pub fn article_url(&self, lang: &str, slug: &str) -> String {
        let blog = self
            .profile(lang)
            .map(|p| p.blog_dir.as_str())
            .unwrap_or("blog");
        if slug.is_empty() {
            format!("{}/{}/{}/", self.domain, lang, blog)
        } else {
            format!("{}/{}/{}/{}", self.domain, lang, blog, slug)
        }
    }

    /// Split an absolute article URL into (language, slug)
    ///
    /// Returns None for URLs outside this site or outside a blog section.
    pub fn slug_from_url(&self, href: &str) -> Option<(String, String)> {
        let path = href.strip_prefix(&self.domain)?;
        for profile in &self.languages {
            let prefix = format!("/{}/{}", profile.code, profile.blog_dir);
            if let Some(rest) = path.strip_prefix(&prefix) {
                if !rest.is_empty() && !rest.starts_with('/') {
                    continue;
                }
                let rest = rest.trim_start_matches('/');
                let slug = rest
                    .split(['?', '#'])
                    .next()
                    .unwrap_or("")
                    .trim_end_matches('/');
                return Some((profile.code.clone(), slug.to_string()));
            }
        }
        None
    }

    /// Directory of one language's blog section on disk
    pub fn blog_dir(&self, lang: &str) -> PathBuf {
        let blog = self
            .profile(lang)
            .map(|p| p.blog_dir.as_str())
            .unwrap_or("blog");
        self.docs_dir.join(lang).join(blog)
    }

    /// Path of the persisted slug registry
    pub fn slug_registry_path(&self) -> PathBuf {
        self.data_dir.join("article-slugs.json")
    }

    /// Path of the symbol cross-reference table
    pub fn symbol_table_path(&self) -> PathBuf {
        self.docs_dir.join("data").join("symbols.json")
    }

    /// Path of the localized UI-string table
    pub fn ui_strings_path(&self) -> PathBuf {
        self.docs_dir.join("data").join("ui-strings.json")
    }

    /// Path of the shared sitemap
    pub fn sitemap_path(&self) -> PathBuf {
        self.docs_dir.join("sitemap.xml")
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            domain: default_domain(),
            default_language: default_language(),
            docs_dir: default_docs_dir(),
            data_dir: default_data_dir(),
            languages: default_languages(),
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
