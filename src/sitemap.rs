/*!
 * Sitemap synchronization.
 *
 * Regenerates the managed portion of the shared flat sitemap from the slug
 * registry: one `<url>` block per article, with per-language alternates.
 * Blocks outside the managed section are never touched, and blocks that
 * were already present keep their recorded last-modified date, so reruns
 * with unchanged inputs are byte-identical.
 */

use anyhow::Result;
use log::info;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::app_config::Config;
use crate::errors::PipelineError;
use crate::slug_registry::SlugRegistry;

/// Regenerates the managed sitemap blocks from the slug registry
pub struct SitemapSync<'a> {
    config: &'a Config,
    registry: &'a SlugRegistry,
}

impl<'a> SitemapSync<'a> {
    /// Create a synchronizer over the run's registry
    pub fn new(config: &'a Config, registry: &'a SlugRegistry) -> Self {
        Self { config, registry }
    }

    /// Rewrite the managed blocks of a sitemap document.
    ///
    /// `today` is the shared last-modified date stamped onto blocks that
    /// were not present before this run.
    pub fn regenerate(&self, sitemap: &str, today: &str) -> Result<String> {
        let close_position = sitemap.rfind("</urlset>").ok_or_else(|| {
            PipelineError::MalformedSource {
                path: PathBuf::from("sitemap.xml"),
                reason: "no closing </urlset> tag".to_string(),
            }
        })?;
        let tail = &sitemap[close_position + "</urlset>".len()..];

        let managed_prefix = self
            .config
            .article_url(&self.config.default_language, "");
        let escaped_prefix = regex::escape(&managed_prefix);

        // Remember the dates of blocks that already exist.
        let lastmod_pattern = Regex::new(&format!(
            r"(?s)<loc>({}[^<]*)</loc>\s*(?:<lastmod>([^<]*)</lastmod>)?",
            escaped_prefix
        ))?;
        let existing_dates: BTreeMap<String, String> = lastmod_pattern
            .captures_iter(sitemap)
            .filter_map(|caps| {
                let loc = caps.get(1)?.as_str().to_string();
                let date = caps.get(2)?.as_str().to_string();
                Some((loc, date))
            })
            .collect();

        let block_pattern = Regex::new(&format!(
            r"(?s)<url>\s*<loc>{}.*?</url>\s*",
            escaped_prefix
        ))?;
        let stripped = block_pattern.replace_all(sitemap, "");
        let head = stripped[..stripped.rfind("</urlset>").unwrap_or(stripped.len())]
            .trim_end()
            .to_string();

        let mut added = 0usize;
        let blocks: Vec<String> = self
            .registry
            .keys()
            .map(|key| {
                let main_url = self.localized_url(key, &self.config.default_language);
                let lastmod = match existing_dates.get(&main_url) {
                    Some(date) => date.clone(),
                    None => {
                        added += 1;
                        today.to_string()
                    }
                };
                self.build_block(key, &main_url, &lastmod)
            })
            .collect();
        info!(
            "Sitemap: {} managed blocks regenerated, {} newly dated",
            blocks.len(),
            added
        );

        Ok(format!("{}\n{}\n</urlset>{}", head, blocks.join("\n"), tail))
    }

    fn build_block(&self, key: &str, main_url: &str, lastmod: &str) -> String {
        let mut lines = vec![
            "  <url>".to_string(),
            format!("    <loc>{}</loc>", main_url),
            format!("    <lastmod>{}</lastmod>", lastmod),
        ];
        for profile in &self.config.languages {
            let href = self.localized_url(key, &profile.code);
            lines.push(format!(
                r#"    <xhtml:link rel="alternate" hreflang="{}" href="{}" />"#,
                profile.code, href
            ));
        }
        lines.push(format!(
            r#"    <xhtml:link rel="alternate" hreflang="x-default" href="{}" />"#,
            main_url
        ));
        lines.push("  </url>".to_string());
        lines.join("\n")
    }

    fn localized_url(&self, key: &str, lang: &str) -> String {
        self.config.article_url(lang, self.registry.lookup(key, lang))
    }
}
