/*!
 * Common test utilities for the weblingo test suite.
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use weblingo::app_config::{Config, TranslationConfig, TranslationProviderKind};
use weblingo::providers::mock::MockProvider;
use weblingo::translation::TranslationService;

/// The main sample article of the test corpus
pub fn article_html() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>How Dreams Work</title>
<meta name="description" content="Why we dream at night.">
<meta name="twitter:title" content="How Dreams Work">
<meta property="og:title" content="How Dreams Work">
<meta property="og:description" content="Why we dream at night.">
<meta property="og:locale" content="en_US">
<meta property="og:url" content="https://example.com/en/blog/how-dreams-work">
<link rel="canonical" href="https://example.com/en/blog/how-dreams-work">
<link rel="alternate" hreflang="en" href="https://example.com/en/blog/how-dreams-work">
<link rel="alternate" hreflang="fr" href="https://example.com/fr/blog/fonctionnement-des-reves">
<link rel="alternate" hreflang="es" href="https://example.com/es/blog/como-funcionan-los-suenos">
<script type="application/ld+json">{"@context":"https://schema.org","@type":"BlogPosting","headline":"How Dreams Work","description":"Why we dream at night.","inLanguage":"en","url":"https://example.com/en/blog/how-dreams-work","mainEntityOfPage":{"@type":"WebPage","@id":"https://example.com/en/blog/how-dreams-work"}}</script>
</head>
<body>
<nav id="navbar">
<a href="/en/">Dream Blog</a>
<a href="/en/#how-it-works">How it works</a>
<a href="/en/blog/">Resources</a>
<button id="languageDropdownButton"><span>EN</span></button>
<div id="languageDropdownMenu"></div>
</nav>
<article>
<h1>How Dreams Work</h1>
<p>
      Dreams are mysterious.
    </p>
<p>See the <a href="../symbols/wolf">wolf</a> entry or read <a href="night-terrors">night terrors</a>.</p>
<pre><code>let dream = true;</code></pre>
<img src="/img/dream.png" alt="A dreaming person">
</article>
<aside role="note">
<p>Editor note.</p>
</aside>
<footer>
<a href="/en/blog/">Blog</a>
<a href="/en/privacy-policy">Privacy</a>
</footer>
</body>
</html>
"##
}

/// A second article, linked from the main one
pub fn second_article_html() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Night Terrors</title>
<link rel="canonical" href="https://example.com/en/blog/night-terrors">
</head>
<body>
<article>
<h1>Night Terrors</h1>
<p>Night terrors are intense.</p>
<p>Back to <a href="how-dreams-work">dreams</a>.</p>
</article>
</body>
</html>
"##
}

/// The blog index page (the root sentinel document)
pub fn index_html() -> &'static str {
    r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Dream Blog</title>
<link rel="canonical" href="https://example.com/en/blog/">
</head>
<body>
<article>
<h1>Dream Blog</h1>
<p>All articles.</p>
</article>
</body>
</html>
"##
}

/// The symbol cross-reference table of the test corpus
pub fn symbols_json() -> &'static str {
    r#"{
  "symbols": [
    {
      "en": {"slug": "wolf"},
      "fr": {"slug": "loup"},
      "es": {"slug": "lobo"},
      "de": {"slug": "wolf-slug-de"},
      "it": {"slug": "lupo"}
    },
    {
      "en": {"slug": "falling"},
      "fr": {"slug": "tomber"}
    }
  ]
}
"#
}

/// The localized UI-string table of the test corpus
pub fn ui_strings_json() -> &'static str {
    r#"{
  "de": {
    "nav_how_it_works_anchor": "wie-es-funktioniert",
    "nav_how_it_works": "Wie es funktioniert",
    "nav_features_anchor": "funktionen",
    "nav_features": "Funktionen",
    "nav_resources": "Ressourcen",
    "legal_slug": "impressum",
    "privacy_slug": "datenschutz",
    "terms_slug": "agb",
    "about_slug": "ueber-uns"
  },
  "it": {
    "nav_resources": "Risorse",
    "privacy_slug": "informativa-privacy"
  }
}
"#
}

/// The initial shared sitemap, holding one unmanaged entry
pub fn sitemap_xml() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
  <url>
    <loc>https://example.com/en/symbols/wolf</loc>
    <lastmod>2024-01-01</lastmod>
  </url>
</urlset>
"#
}

/// Translation settings suitable for fast deterministic tests
pub fn mock_translation_config() -> TranslationConfig {
    TranslationConfig {
        provider: TranslationProviderKind::Mock,
        retry_backoff_ms: 1,
        request_delay_ms: 0,
        ..TranslationConfig::default()
    }
}

/// A translation service around an inspectable mock provider
pub fn mock_service() -> (TranslationService, Arc<MockProvider>) {
    mock_service_with(MockProvider::working())
}

/// A translation service around a specific mock provider
pub fn mock_service_with(provider: MockProvider) -> (TranslationService, Arc<MockProvider>) {
    let provider = Arc::new(provider);
    let service = TranslationService::with_provider(provider.clone(), mock_translation_config());
    (service, provider)
}

/// A configuration rooted in a test directory
pub fn test_config(root: &Path) -> Config {
    Config {
        domain: "https://example.com".to_string(),
        docs_dir: root.join("docs"),
        data_dir: root.join("data"),
        translation: mock_translation_config(),
        ..Config::default()
    }
}

/// Write the full test corpus under a root directory
pub fn write_corpus(root: &Path) {
    let blog = root.join("docs").join("en").join("blog");
    fs::create_dir_all(&blog).unwrap();
    fs::write(blog.join("index.html"), index_html()).unwrap();
    fs::write(blog.join("how-dreams-work.html"), article_html()).unwrap();
    fs::write(blog.join("night-terrors.html"), second_article_html()).unwrap();

    let data = root.join("docs").join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("symbols.json"), symbols_json()).unwrap();
    fs::write(data.join("ui-strings.json"), ui_strings_json()).unwrap();

    fs::write(root.join("docs").join("sitemap.xml"), sitemap_xml()).unwrap();
}
