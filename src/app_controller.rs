use anyhow::{anyhow, Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;

use crate::app_config::Config;
use crate::document::Document;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::rewriter::Rewriter;
use crate::site_data::{SymbolTable, UiStrings};
use crate::slug_registry::{SlugRegistry, ROOT_KEY};
use crate::translation::{BatchTranslator, TranslationService};

// @module: Application controller for the localization pipeline

/// Main application controller for corpus localization
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration this controller runs with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the slug registry from the source corpus and persist it
    pub async fn run_extract(&self, service: &TranslationService) -> Result<()> {
        info!(
            "🚀 weblingo extract: provider {} over {:?}",
            service.provider_name(),
            self.config.blog_dir(&self.config.default_language)
        );
        let registry = SlugRegistry::extract(&self.config, service).await?;
        FileManager::ensure_dir(&self.config.data_dir)?;
        registry.save(self.config.slug_registry_path())?;
        info!(
            "Wrote {} article mappings to {:?}",
            registry.len(),
            self.config.slug_registry_path()
        );
        Ok(())
    }

    /// Produce localized documents for one language across the whole corpus
    pub async fn run_generate(&self, lang: &str, service: &TranslationService) -> Result<()> {
        language_utils::validate_language_code(lang)?;
        if self.config.profile(lang).is_none() {
            return Err(anyhow!("Language '{}' has no configured profile", lang));
        }
        if lang == self.config.default_language {
            return Err(anyhow!(
                "'{}' is the corpus source language, nothing to generate",
                lang
            ));
        }

        let registry = self.load_or_extract_registry(service).await?;
        let symbols = SymbolTable::load(
            self.config.symbol_table_path(),
            &self.config.default_language,
        )?;
        let ui = UiStrings::load(self.config.ui_strings_path())?;
        let rewriter = Rewriter::new(&self.config, &registry, &symbols, &ui);
        let batch = BatchTranslator::new(service, self.config.translation.max_batch_chars);

        let files =
            FileManager::list_documents(self.config.blog_dir(&self.config.default_language))?;
        info!(
            "🚀 weblingo generate {}: {} documents, provider {}",
            lang,
            files.len(),
            service.provider_name()
        );

        let progress = make_progress_bar(files.len() as u64, "documents");
        for file in &files {
            progress.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
            self.generate_document(file, lang, service, &registry, &rewriter, &batch)
                .await
                .with_context(|| format!("Failed to localize {:?}", file))?;
            progress.inc(1);
        }
        progress.finish_with_message("done");

        let (hits, misses, hit_rate) = service.cache.stats();
        info!(
            "Translation cache: {} hits, {} misses ({:.0}% hit rate)",
            hits,
            misses,
            hit_rate * 100.0
        );
        Ok(())
    }

    /// Refresh alternate links and chrome on already-generated documents
    /// without retranslating any content
    pub fn run_update_hreflang(&self) -> Result<()> {
        let registry = self.load_registry()?;
        let symbols = SymbolTable::load(
            self.config.symbol_table_path(),
            &self.config.default_language,
        )?;
        let ui = UiStrings::load(self.config.ui_strings_path())?;
        let rewriter = Rewriter::new(&self.config, &registry, &symbols, &ui);

        for profile in &self.config.languages {
            let files = FileManager::list_documents(self.config.blog_dir(&profile.code))?;
            info!(
                "Refreshing alternate links on {} documents ({})",
                files.len(),
                profile.code
            );
            for file in &files {
                self.refresh_document(file, &profile.code, &rewriter)
                    .with_context(|| format!("Failed to refresh {:?}", file))?;
            }
        }
        Ok(())
    }

    /// Resync the shared sitemap from the persisted slug registry
    pub fn run_update_sitemap(&self) -> Result<()> {
        let registry = self.load_registry()?;
        let sitemap_path = self.config.sitemap_path();
        let sitemap = FileManager::read_to_string(&sitemap_path)?;

        let today = Local::now().format("%Y-%m-%d").to_string();
        let sync = crate::sitemap::SitemapSync::new(&self.config, &registry);
        let updated = sync.regenerate(&sitemap, &today)?;
        FileManager::write_to_file(&sitemap_path, &updated)?;
        info!("Updated {:?}", sitemap_path);
        Ok(())
    }

    /// Run the full per-document pipeline for one article
    async fn generate_document(
        &self,
        file: &Path,
        lang: &str,
        service: &TranslationService,
        registry: &SlugRegistry,
        rewriter: &Rewriter<'_>,
        batch: &BatchTranslator<'_>,
    ) -> Result<()> {
        let key = FileManager::article_key(file);
        let target_slug = if key == ROOT_KEY {
            String::new()
        } else {
            registry
                .get(&key, lang)
                .ok_or_else(|| PipelineError::MissingMapping {
                    entry: key.clone(),
                    language: lang.to_string(),
                })?
                .to_string()
        };

        let html = FileManager::read_to_string(file)?;
        let mut doc = Document::parse(&html);
        let source_lang = &self.config.default_language;

        if let Some(html_element) = doc.find_by_tag(doc.root(), "html") {
            doc.set_attr(html_element, "lang", lang);
        }

        rewriter
            .localize_head(&mut doc, service, lang, &key, file)
            .await?;

        for scope in self.content_regions(&doc) {
            batch
                .translate_region(&mut doc, scope, source_lang, lang)
                .await?;
            batch
                .translate_attributes(&mut doc, scope, source_lang, lang)
                .await?;
        }

        rewriter.update_alternate_links(&mut doc, &key);
        rewriter.update_language_menu(&mut doc, lang, &key);
        rewriter.update_nav_links(&mut doc, lang);
        rewriter.update_footer_links(&mut doc, lang);
        rewriter.update_internal_links(&mut doc, lang)?;

        let file_name = if key == ROOT_KEY {
            "index.html".to_string()
        } else {
            format!("{}.html", target_slug)
        };
        let out_path = self.config.blog_dir(lang).join(file_name);
        FileManager::write_to_file(out_path, &doc.serialize())?;
        Ok(())
    }

    /// Refresh one already-generated document in place
    fn refresh_document(&self, file: &Path, lang: &str, rewriter: &Rewriter<'_>) -> Result<()> {
        let html = FileManager::read_to_string(file)?;
        let mut doc = Document::parse(&html);
        let key = self.resolve_article_key(&doc, file, lang);

        rewriter.update_alternate_links(&mut doc, &key);
        rewriter.update_language_menu(&mut doc, lang, &key);
        rewriter.update_nav_links(&mut doc, lang);
        rewriter.update_footer_links(&mut doc, lang);

        FileManager::write_to_file(file, &doc.serialize())?;
        Ok(())
    }

    /// Resolve a document's article key.
    ///
    /// Source-language documents are keyed by their file name; localized
    /// documents resolve through their source-language alternate link,
    /// falling back to the file name.
    fn resolve_article_key(&self, doc: &Document, file: &Path, lang: &str) -> String {
        let stem = FileManager::article_key(file);
        if stem == ROOT_KEY || lang == self.config.default_language {
            return stem;
        }

        for link in doc.find_all_by_tag(doc.root(), "link") {
            if doc.attr(link, "rel") != Some("alternate") {
                continue;
            }
            if doc.attr(link, "hreflang") != Some(self.config.default_language.as_str()) {
                continue;
            }
            let Some(href) = doc.attr(link, "href") else {
                continue;
            };
            if let Some((_, slug)) = self.config.slug_from_url(href) {
                return if slug.is_empty() {
                    ROOT_KEY.to_string()
                } else {
                    slug
                };
            }
        }
        stem
    }

    /// The document regions whose text is translated
    fn content_regions(&self, doc: &Document) -> Vec<crate::document::NodeId> {
        let root = doc.root();
        let mut regions = Vec::new();
        if let Some(nav) = doc.find_by_attr(root, "nav", "id", "navbar") {
            regions.push(nav);
        }
        if let Some(article) = doc.find_by_tag(root, "article") {
            regions.push(article);
        }
        if let Some(aside) = doc.find_by_attr(root, "aside", "role", "note") {
            regions.push(aside);
        }
        if let Some(footer) = doc.find_by_tag(root, "footer") {
            regions.push(footer);
        }
        regions
    }

    /// Load the persisted registry, or build and persist it when missing
    async fn load_or_extract_registry(
        &self,
        service: &TranslationService,
    ) -> Result<SlugRegistry> {
        let path = self.config.slug_registry_path();
        if FileManager::file_exists(&path) {
            return SlugRegistry::load(&path);
        }
        warn!("Slug registry missing at {:?}, extracting it first", path);
        let registry = SlugRegistry::extract(&self.config, service).await?;
        FileManager::ensure_dir(&self.config.data_dir)?;
        registry.save(&path)?;
        Ok(registry)
    }

    /// Load the persisted registry, failing when it has not been built yet
    fn load_registry(&self) -> Result<SlugRegistry> {
        let path = self.config.slug_registry_path();
        if !FileManager::file_exists(&path) {
            return Err(anyhow!(
                "Slug registry not found at {:?}; run 'extract' first",
                path
            ));
        }
        SlugRegistry::load(path)
    }
}

/// Build the progress bar used for corpus-wide passes
fn make_progress_bar(total: u64, unit: &str) -> ProgressBar {
    let progress = ProgressBar::new(total);
    let template = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} {{msg}}",
            unit
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(template.progress_chars("█▓▒░"));
    progress
}
