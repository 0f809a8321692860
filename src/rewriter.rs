/*!
 * Link and metadata rewriting.
 *
 * Rewrites a localized document's navigation, footer, canonical/alternate
 * links, language selector and embedded structured-data payloads so the
 * cross-language link graph stays consistent with the slug registry and
 * the auxiliary cross-reference tables.
 */

use log::warn;
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

use crate::app_config::Config;
use crate::document::{escape_text, unescape, Document};
use crate::errors::PipelineError;
use crate::site_data::{SymbolTable, UiStrings};
use crate::slug_registry::SlugRegistry;
use crate::translation::TranslationService;

/// Anchor of the how-it-works section in the source language
const HOW_IT_WORKS_ANCHOR: &str = "how-it-works";

/// Anchor of the features section in the source language
const FEATURES_ANCHOR: &str = "features";

/// Footer document slugs in the source language
const LEGAL_SLUG: &str = "legal-notice";
const PRIVACY_SLUG: &str = "privacy-policy";
const TERMS_SLUG: &str = "terms";
const ABOUT_SLUG: &str = "about";

/// Classes of the generated language-selector entries; these mirror the
/// site templates the selector lives in
const DROPDOWN_ITEM_CLASS: &str = "dropdown-item flex items-center justify-between px-4 py-2 \
                                   text-sm text-purple-100/80 hover:bg-white/10 hover:text-white \
                                   transition-colors";
const CHECK_ICON_CLASS: &str = "w-4 h-4 text-dream-salmon";

/// Rewrites links and metadata of one localized document
pub struct Rewriter<'a> {
    config: &'a Config,
    registry: &'a SlugRegistry,
    symbols: &'a SymbolTable,
    ui: &'a UiStrings,
}

impl<'a> Rewriter<'a> {
    /// Create a rewriter over the run's read-only tables
    pub fn new(
        config: &'a Config,
        registry: &'a SlugRegistry,
        symbols: &'a SymbolTable,
        ui: &'a UiStrings,
    ) -> Self {
        Self {
            config,
            registry,
            symbols,
            ui,
        }
    }

    /// Localized URL of an article
    fn localized_url(&self, key: &str, lang: &str) -> String {
        self.config
            .article_url(lang, self.registry.lookup(key, lang))
    }

    /// Regenerate the alternate-language link set in `<head>`.
    ///
    /// Exactly one entry per supported language plus one x-default entry
    /// pointing at the source language's version of the same document.
    pub fn update_alternate_links(&self, doc: &mut Document, key: &str) {
        let Some(head) = doc.find_by_tag(doc.root(), "head") else {
            return;
        };

        for link in doc.find_all_by_tag(head, "link") {
            if doc.attr(link, "rel") == Some("alternate") {
                doc.detach(link);
            }
        }

        let mut anchor = ["next", "prev", "canonical"]
            .iter()
            .find_map(|rel| doc.find_by_attr(head, "link", "rel", rel));

        let mut entries: Vec<(String, String)> = self
            .config
            .languages
            .iter()
            .map(|profile| {
                (
                    profile.code.clone(),
                    self.localized_url(key, &profile.code),
                )
            })
            .collect();
        entries.push((
            "x-default".to_string(),
            self.localized_url(key, &self.config.default_language),
        ));

        for (hreflang, href) in entries {
            let link = doc.create_element(
                "link",
                &[("rel", "alternate"), ("hreflang", &hreflang), ("href", &href)],
            );
            match anchor {
                Some(previous) => doc.insert_after(previous, link),
                None => doc.append_child(head, link),
            }
            anchor = Some(link);
        }
    }

    /// Rebuild the language-selector fragment.
    ///
    /// One entry per supported language, the active one marked by its
    /// visible check icon, each entry linking to that language's version
    /// of the current document.
    pub fn update_language_menu(&self, doc: &mut Document, lang: &str, key: &str) {
        if let Some(button) = doc.find_by_id(doc.root(), "languageDropdownButton") {
            if let Some(span) = doc.find_by_tag(button, "span") {
                if let Some(profile) = self.config.profile(lang) {
                    doc.set_text_content(span, &escape_text(&profile.label));
                }
            }
        }

        let Some(menu) = doc.find_by_id(doc.root(), "languageDropdownMenu") else {
            return;
        };
        doc.clear_children(menu);

        for profile in &self.config.languages {
            let slug = self.registry.lookup(key, &profile.code);
            let href = if slug.is_empty() {
                format!("../../{}/{}/", profile.code, profile.blog_dir)
            } else {
                format!("../../{}/{}/{}", profile.code, profile.blog_dir, slug)
            };

            let item = doc.create_element(
                "a",
                &[
                    ("href", &href),
                    ("hreflang", &profile.code),
                    ("class", DROPDOWN_ITEM_CLASS),
                    ("role", "menuitem"),
                ],
            );

            let label = doc.create_element("span", &[]);
            let text = escape_text(&profile.name);
            doc.set_text_content(label, &text);
            doc.append_child(item, label);

            let icon_class = if profile.code == lang {
                CHECK_ICON_CLASS.to_string()
            } else {
                format!("{} hidden", CHECK_ICON_CLASS)
            };
            let icon = doc.create_element("i", &[("data-lucide", "check"), ("class", &icon_class)]);
            doc.append_child(item, icon);

            doc.append_child(menu, item);
        }
    }

    /// Localize the navigation chrome: brand link, section anchors, blog link
    pub fn update_nav_links(&self, doc: &mut Document, lang: &str) {
        let Some(nav) = doc.find_by_attr(doc.root(), "nav", "id", "navbar") else {
            return;
        };

        let default_prefix = format!("/{}/", self.config.default_language);
        let anchors = doc.find_all_by_tag(nav, "a");

        if let Some(brand) = anchors.iter().copied().find(|&a| {
            doc.attr(a, "href")
                .map(|href| href.starts_with(&default_prefix))
                .unwrap_or(false)
        }) {
            doc.set_attr(brand, "href", &format!("/{}/", lang));
        }

        let how_anchors = self.known_values("nav_how_it_works_anchor", HOW_IT_WORKS_ANCHOR);
        let feature_anchors = self.known_values("nav_features_anchor", FEATURES_ANCHOR);
        let blog_segments = self.blog_segments();

        for link in anchors {
            if doc.attr(link, "hreflang").is_some() {
                continue;
            }
            let href = match doc.attr(link, "href") {
                Some(href) => href.to_string(),
                None => continue,
            };

            if ends_with_fragment(&href, &how_anchors) {
                if let Some(anchor) = self.ui.get(lang, "nav_how_it_works_anchor") {
                    doc.set_attr(link, "href", &format!("/{}/#{}", lang, anchor));
                }
                if let Some(label) = self.ui.get(lang, "nav_how_it_works") {
                    doc.set_text_content(link, &escape_text(label));
                }
            } else if ends_with_fragment(&href, &feature_anchors) {
                if let Some(anchor) = self.ui.get(lang, "nav_features_anchor") {
                    doc.set_attr(link, "href", &format!("/{}/#{}", lang, anchor));
                }
                if let Some(label) = self.ui.get(lang, "nav_features") {
                    doc.set_text_content(link, &escape_text(label));
                }
            } else if blog_segments
                .iter()
                .any(|segment| href.contains(&format!("/{}/", segment)))
            {
                doc.set_attr(link, "href", &self.blog_index_path(lang));
                if let Some(label) = self.ui.get(lang, "nav_resources") {
                    doc.set_text_content(link, &escape_text(label));
                }
            }
        }
    }

    /// Localize footer links: blog index and the legal-document family
    pub fn update_footer_links(&self, doc: &mut Document, lang: &str) {
        let Some(footer) = doc.find_by_tag(doc.root(), "footer") else {
            return;
        };

        let blog_segments = self.blog_segments();
        let legal = self.known_values("legal_slug", LEGAL_SLUG);
        let privacy = self.known_values("privacy_slug", PRIVACY_SLUG);
        let terms = self.known_values("terms_slug", TERMS_SLUG);
        let about = self.known_values("about_slug", ABOUT_SLUG);

        for link in doc.find_all_by_tag(footer, "a") {
            let href = match doc.attr(link, "href") {
                Some(href) => href.to_string(),
                None => continue,
            };

            if blog_segments
                .iter()
                .any(|segment| href.ends_with(&format!("/{}/", segment)) || href.ends_with(&format!("/{}", segment)))
            {
                doc.set_attr(link, "href", &self.blog_index_path(lang));
            }
            if legal.iter().any(|slug| href.ends_with(slug.as_str())) {
                if let Some(slug) = self.ui.get(lang, "legal_slug") {
                    doc.set_attr(link, "href", &format!("../{}", slug));
                }
            }
            if privacy.iter().any(|slug| href.ends_with(slug.as_str())) {
                if let Some(slug) = self.ui.get(lang, "privacy_slug") {
                    doc.set_attr(link, "href", &format!("../{}", slug));
                }
            }
            if terms.iter().any(|slug| href.ends_with(slug.as_str())) {
                if let Some(slug) = self.ui.get(lang, "terms_slug") {
                    doc.set_attr(link, "href", &format!("../{}", slug));
                }
            }
            if about.iter().any(|slug| href.ends_with(&format!("/{}", slug))) {
                if let Some(slug) = self.ui.get(lang, "about_slug") {
                    doc.set_attr(link, "href", &format!("/{}/{}", lang, slug));
                }
            }
        }
    }

    /// Rewrite intra-site links to their localized equivalents.
    ///
    /// Absolute external links, mail links and fragment links pass through
    /// untouched. Glossary references resolve through the symbol table,
    /// bare article references through the slug registry.
    pub fn update_internal_links(&self, doc: &mut Document, lang: &str) -> Result<(), PipelineError> {
        let Some(profile) = self.config.profile(lang) else {
            return Ok(());
        };
        let default_lang = &self.config.default_language;
        let default_profile = self.config.profile(default_lang);
        let default_blog_prefix = default_profile
            .map(|p| format!("/{}/{}/", default_lang, p.blog_dir))
            .unwrap_or_else(|| format!("/{}/blog/", default_lang));
        let default_symbol_prefix = default_profile
            .map(|p| format!("../{}/", p.symbols_dir))
            .unwrap_or_else(|| "../symbols/".to_string());
        let default_lang_prefix = format!("/{}/", default_lang);

        for link in doc.find_all_by_tag(doc.root(), "a") {
            let original = match doc.attr(link, "href") {
                Some(href) if !href.is_empty() => href.to_string(),
                _ => continue,
            };
            let mut href = original.clone();
            if href.starts_with("http://")
                || href.starts_with("https://")
                || href.starts_with("mailto:")
                || href.starts_with('#')
            {
                continue;
            }

            if let Some(rest) = href.strip_prefix(&default_blog_prefix) {
                href = format!("/{}/{}/{}", lang, profile.blog_dir, rest);
            } else if let Some(rest) = href.strip_prefix(&default_lang_prefix) {
                href = format!("/{}/{}", lang, rest);
            }

            if let Some(symbol) = href.strip_prefix(&default_symbol_prefix) {
                let symbol = symbol.to_string();
                let target = if self.symbols.contains(&symbol) {
                    self.symbols
                        .lookup(&symbol, lang)
                        .map(|slug| slug.to_string())
                        .ok_or_else(|| PipelineError::MissingMapping {
                            entry: symbol.clone(),
                            language: lang.to_string(),
                        })?
                } else {
                    symbol
                };
                href = format!("../{}/{}", profile.symbols_dir, target);
            }

            if !href.starts_with('/') && !href.contains('/') && href != "." && href != ".." {
                if self.registry.contains(&href) {
                    let slug = self.registry.get(&href, lang).ok_or_else(|| {
                        PipelineError::MissingMapping {
                            entry: href.clone(),
                            language: lang.to_string(),
                        }
                    })?;
                    href = slug.to_string();
                }
            }

            if href != original {
                doc.set_attr(link, "href", &href);
            }
        }
        Ok(())
    }

    /// Localize the document head: title, metas, canonical, prev/next and
    /// the embedded structured-data payloads.
    pub async fn localize_head(
        &self,
        doc: &mut Document,
        service: &TranslationService,
        lang: &str,
        key: &str,
        path: &Path,
    ) -> Result<(), PipelineError> {
        let source_lang = self.config.default_language.clone();
        let url = self.localized_url(key, lang);

        if let Some(title) = doc.find_by_tag(doc.root(), "title") {
            let text = unescape(&doc.text_content(title));
            if !text.trim().is_empty() {
                let translated = service.translate_text(&text, &source_lang, lang).await?;
                doc.set_text_content(title, &escape_text(&translated));
            }
        }

        for meta in doc.find_all_by_tag(doc.root(), "meta") {
            let name = doc.attr(meta, "name").map(str::to_string);
            let property = doc.attr(meta, "property").map(str::to_string);
            let name = name.as_deref();
            let property = property.as_deref();

            let translatable = matches!(name, Some("description" | "twitter:description"))
                || matches!(property, Some("og:description"))
                || matches!(name, Some("twitter:title"))
                || matches!(property, Some("og:title"))
                || matches!(property, Some("og:image:alt"))
                || matches!(name, Some("twitter:image:alt"));
            if translatable {
                if let Some(content) = doc.attr(meta, "content").map(str::to_string) {
                    let text = unescape(&content);
                    if !text.trim().is_empty() {
                        let translated = service.translate_text(&text, &source_lang, lang).await?;
                        doc.set_attr(meta, "content", &translated);
                    }
                }
            }

            if property == Some("og:locale") {
                if let Some(profile) = self.config.profile(lang) {
                    doc.set_attr(meta, "content", &profile.locale);
                }
            }
            if property == Some("og:url") {
                doc.set_attr(meta, "content", &url);
            }
        }

        if let Some(canonical) = doc.find_by_attr(doc.root(), "link", "rel", "canonical") {
            doc.set_attr(canonical, "href", &url);
        }

        for rel in ["prev", "next"] {
            let Some(link) = doc.find_by_attr(doc.root(), "link", "rel", rel) else {
                continue;
            };
            let Some(href) = doc.attr(link, "href").map(str::to_string) else {
                continue;
            };
            let Some((_, target_key)) = self.config.slug_from_url(&href) else {
                continue;
            };
            if target_key.is_empty() {
                continue;
            }
            let slug = self.registry.get(&target_key, lang).ok_or_else(|| {
                PipelineError::MissingMapping {
                    entry: target_key.clone(),
                    language: lang.to_string(),
                }
            })?;
            let localized = self.config.article_url(lang, slug);
            doc.set_attr(link, "href", &localized);
        }

        self.localize_structured_data(doc, service, lang, key, path)
            .await
    }

    /// Locale-specific field substitution inside JSON-LD payloads
    async fn localize_structured_data(
        &self,
        doc: &mut Document,
        service: &TranslationService,
        lang: &str,
        key: &str,
        path: &Path,
    ) -> Result<(), PipelineError> {
        let source_lang = self.config.default_language.clone();
        let url = self.localized_url(key, lang);

        for script in doc.find_all_by_tag(doc.root(), "script") {
            if doc.attr(script, "type") != Some("application/ld+json") {
                continue;
            }
            let raw = doc.text_content(script);
            if raw.trim().is_empty() {
                continue;
            }
            let mut data: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        "Skipping unparseable structured data in {:?}: {}",
                        path, e
                    );
                    continue;
                }
            };

            let payload_type = data
                .get("@type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match payload_type.as_str() {
                "BlogPosting" => {
                    self.translate_field(&mut data, "headline", service, &source_lang, lang)
                        .await?;
                    self.translate_field(&mut data, "description", service, &source_lang, lang)
                        .await?;
                    data["inLanguage"] = Value::String(lang.to_string());
                    if data.get("url").is_some() {
                        data["url"] = Value::String(url.clone());
                    }
                    if let Some(main_entity) = data.get_mut("mainEntityOfPage") {
                        if main_entity.is_object() {
                            main_entity["@id"] = Value::String(url.clone());
                        }
                    }
                }
                "FAQPage" => {
                    let entities = match data.get_mut("mainEntity").and_then(Value::as_array_mut) {
                        Some(entities) => entities,
                        None => continue,
                    };
                    for entity in entities {
                        if !entity.is_object() {
                            continue;
                        }
                        self.translate_field(entity, "name", service, &source_lang, lang)
                            .await?;
                        if let Some(answer) = entity.get_mut("acceptedAnswer") {
                            if answer.is_object() {
                                self.translate_field(answer, "text", service, &source_lang, lang)
                                    .await?;
                            }
                        }
                    }
                }
                "Blog" => {
                    self.translate_field(&mut data, "name", service, &source_lang, lang)
                        .await?;
                    self.translate_field(&mut data, "description", service, &source_lang, lang)
                        .await?;
                    data["inLanguage"] = Value::String(lang.to_string());
                    data["url"] = Value::String(self.config.article_url(lang, ""));
                }
                "ItemList" => {
                    let items = match data.get_mut("itemListElement").and_then(Value::as_array_mut) {
                        Some(items) => items,
                        None => continue,
                    };
                    for item in items {
                        if !item.is_object() {
                            continue;
                        }
                        self.translate_field(item, "name", service, &source_lang, lang)
                            .await?;
                        let item_url = item.get("url").and_then(Value::as_str).map(str::to_string);
                        if let Some(item_url) = item_url {
                            if let Some((_, item_key)) = self.config.slug_from_url(&item_url) {
                                if !item_key.is_empty() {
                                    let slug = self.registry.lookup(&item_key, lang);
                                    item["url"] =
                                        Value::String(self.config.article_url(lang, slug));
                                }
                            }
                        }
                    }
                }
                _ => continue,
            }

            let serialized =
                serde_json::to_string_pretty(&data).map_err(|e| PipelineError::Validation {
                    context: format!("{:?}", path),
                    reason: e.to_string(),
                })?;
            doc.set_text_content(script, &serialized);
        }
        Ok(())
    }

    /// Translate one optional string field of a JSON object in place
    async fn translate_field(
        &self,
        value: &mut Value,
        field: &str,
        service: &TranslationService,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<(), PipelineError> {
        let text = match value.get(field).and_then(Value::as_str) {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => return Ok(()),
        };
        let translated = service.translate_text(&text, source_lang, target_lang).await?;
        value[field] = Value::String(translated);
        Ok(())
    }

    /// Site-absolute path of a language's blog index
    fn blog_index_path(&self, lang: &str) -> String {
        let blog = self
            .config
            .profile(lang)
            .map(|p| p.blog_dir.as_str())
            .unwrap_or("blog");
        format!("/{}/{}/", lang, blog)
    }

    /// Blog path segments across every language
    fn blog_segments(&self) -> BTreeSet<String> {
        self.config
            .languages
            .iter()
            .map(|p| p.blog_dir.clone())
            .collect()
    }

    /// UI-table values of a field across every language, plus the
    /// source-language default
    fn known_values(&self, field: &str, default: &str) -> BTreeSet<String> {
        let mut values: BTreeSet<String> =
            self.ui.values(field).into_iter().map(str::to_string).collect();
        values.insert(default.to_string());
        values
    }
}

/// Whether a href ends in `#anchor` for any of the known anchors
fn ends_with_fragment(href: &str, anchors: &BTreeSet<String>) -> bool {
    anchors
        .iter()
        .any(|anchor| href.ends_with(&format!("#{}", anchor)))
}
