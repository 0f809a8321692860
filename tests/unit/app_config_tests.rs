/*!
 * Tests for application configuration
 */

use weblingo::app_config::{Config, TranslationProviderKind};

#[test]
fn test_defaultConfig_shouldValidate() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.default_language, "en");
    assert_eq!(config.languages.len(), 5);
    assert_eq!(config.translation.provider, TranslationProviderKind::Google);
}

#[test]
fn test_profile_withConfiguredLanguage_shouldExposeSectionSegments() {
    let config = Config::default();
    let de = config.profile("de").unwrap();
    assert_eq!(de.locale, "de_DE");
    assert_eq!(de.label, "DE");
    assert_eq!(de.blog_dir, "blog");
    assert_eq!(de.symbols_dir, "traumsymbole");
    assert!(config.profile("xx").is_none());
}

#[test]
fn test_targetLanguages_shouldExcludeTheSourceLanguage() {
    let config = Config::default();
    let targets: Vec<&str> = config
        .target_languages()
        .into_iter()
        .map(|p| p.code.as_str())
        .collect();
    assert_eq!(targets, vec!["fr", "es", "de", "it"]);
}

#[test]
fn test_articleUrl_withSlugAndIndex_shouldBuildCanonicalForms() {
    let config = Config::default();
    assert_eq!(
        config.article_url("de", "wie-traeume-funktionieren"),
        "https://example.com/de/blog/wie-traeume-funktionieren"
    );
    assert_eq!(config.article_url("de", ""), "https://example.com/de/blog/");
}

#[test]
fn test_slugFromUrl_withArticleUrl_shouldSplitLanguageAndSlug() {
    let config = Config::default();
    assert_eq!(
        config.slug_from_url("https://example.com/fr/blog/fonctionnement-des-reves"),
        Some(("fr".to_string(), "fonctionnement-des-reves".to_string()))
    );
    assert_eq!(
        config.slug_from_url("https://example.com/en/blog/"),
        Some(("en".to_string(), String::new()))
    );
    assert_eq!(
        config.slug_from_url("https://example.com/en/blog/slug?ref=1"),
        Some(("en".to_string(), "slug".to_string()))
    );
}

#[test]
fn test_slugFromUrl_withForeignUrl_shouldReturnNone() {
    let config = Config::default();
    assert_eq!(config.slug_from_url("https://other.example/en/blog/x"), None);
    assert_eq!(config.slug_from_url("https://example.com/en/symbols/wolf"), None);
    assert_eq!(config.slug_from_url("https://example.com/en/blogging/x"), None);
}

#[test]
fn test_parse_withEmptyJson_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.domain, "https://example.com");
    assert_eq!(config.translation.max_batch_chars, 2500);
    assert_eq!(config.translation.retry_count, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withTrailingSlashDomain_shouldFail() {
    let config = Config {
        domain: "https://example.com/".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownDefaultLanguage_shouldFail() {
    let config = Config {
        default_language: "zz".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withTinyBatchBudget_shouldFail() {
    let mut config = Config::default();
    config.translation.max_batch_chars = 10;
    assert!(config.validate().is_err());
}

#[test]
fn test_saveLoad_withDefaultConfig_shouldRoundTrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf.json");
    let config = Config::default();
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.domain, config.domain);
    assert_eq!(loaded.languages, config.languages);
}
