/*!
 * Tests for sitemap synchronization
 */

use weblingo::app_config::Config;
use weblingo::sitemap::SitemapSync;
use weblingo::slug_registry::{SlugRegistry, ROOT_KEY};

use crate::common;

fn sample_registry() -> SlugRegistry {
    let mut registry = SlugRegistry::new("en");
    for lang in ["en", "fr", "es", "de", "it"] {
        registry.insert(ROOT_KEY, lang, "");
    }
    registry.insert("how-dreams-work", "en", "how-dreams-work");
    registry.insert("how-dreams-work", "fr", "fonctionnement-des-reves");
    registry.insert("how-dreams-work", "es", "como-funcionan-los-suenos");
    registry.insert("how-dreams-work", "de", "wie-traeume-funktionieren");
    registry.insert("how-dreams-work", "it", "come-funzionano-i-sogni");
    registry
}

#[test]
fn test_regenerate_withEmptyManagedSection_shouldInsertSortedBlocks() {
    let config = Config::default();
    let registry = sample_registry();
    let sync = SitemapSync::new(&config, &registry);

    let updated = sync.regenerate(common::sitemap_xml(), "2026-08-06").unwrap();

    // Unmanaged entry untouched.
    assert!(updated.contains("<loc>https://example.com/en/symbols/wolf</loc>"));
    assert!(updated.contains("<lastmod>2024-01-01</lastmod>"));
    // One block per article, new blocks share the run date.
    assert!(updated.contains("<loc>https://example.com/en/blog/how-dreams-work</loc>"));
    assert!(updated.contains("<loc>https://example.com/en/blog/</loc>"));
    assert!(updated.contains("<lastmod>2026-08-06</lastmod>"));
    // Per-language alternates plus the default fallback.
    assert!(updated.contains(
        r#"<xhtml:link rel="alternate" hreflang="de" href="https://example.com/de/blog/wie-traeume-funktionieren" />"#
    ));
    assert!(updated.contains(
        r#"<xhtml:link rel="alternate" hreflang="x-default" href="https://example.com/en/blog/how-dreams-work" />"#
    ));
    // The managed section precedes the closing tag and keeps the tail.
    assert!(updated.trim_end().ends_with("</urlset>"));
}

#[test]
fn test_regenerate_withExistingBlocks_shouldPreserveTheirDates() {
    let config = Config::default();
    let registry = sample_registry();
    let sync = SitemapSync::new(&config, &registry);

    let first = sync.regenerate(common::sitemap_xml(), "2026-08-06").unwrap();
    let second = sync.regenerate(&first, "2026-12-31").unwrap();

    // Rerun with a later date: already-present entries keep their date.
    assert_eq!(first, second);
}

#[test]
fn test_regenerate_withRemovedArticle_shouldDropItsBlock() {
    let config = Config::default();
    let registry = sample_registry();
    let sync = SitemapSync::new(&config, &registry);
    let first = sync.regenerate(common::sitemap_xml(), "2026-08-06").unwrap();

    let mut smaller = SlugRegistry::new("en");
    for lang in ["en", "fr", "es", "de", "it"] {
        smaller.insert(ROOT_KEY, lang, "");
    }
    let sync = SitemapSync::new(&config, &smaller);
    let second = sync.regenerate(&first, "2026-12-31").unwrap();

    assert!(!second.contains("how-dreams-work"));
    assert!(second.contains("<loc>https://example.com/en/blog/</loc>"));
    assert!(second.contains("<loc>https://example.com/en/symbols/wolf</loc>"));
}

#[test]
fn test_regenerate_withMissingUrlsetClose_shouldFail() {
    let config = Config::default();
    let registry = sample_registry();
    let sync = SitemapSync::new(&config, &registry);

    let error = sync.regenerate("<urlset>", "2026-08-06").unwrap_err();
    assert!(error.to_string().contains("urlset"));
}
