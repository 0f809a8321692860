/*!
 * Idempotence tests for the refresh commands
 */

use std::fs;
use std::path::Path;

use weblingo::app_controller::Controller;
use weblingo::document::Document;

use crate::common;

#[tokio::test]
async fn test_updateHreflang_withUnchangedRegistry_shouldBeByteIdempotent() {
    let dir = tempfile::tempdir().unwrap();
    common::write_corpus(dir.path());
    let controller = Controller::with_config(common::test_config(dir.path())).unwrap();
    let (service, _mock) = common::mock_service();
    controller.run_generate("de", &service).await.unwrap();

    // First refresh normalizes the whole corpus (the source documents gain
    // the regenerated alternate set and selector).
    controller.run_update_hreflang().unwrap();
    let first = snapshot(&dir.path().join("docs"));

    // A second refresh with the same registry must change nothing.
    controller.run_update_hreflang().unwrap();
    let second = snapshot(&dir.path().join("docs"));

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_updateHreflang_onSourceDocuments_shouldAddDerivedAlternates() {
    let dir = tempfile::tempdir().unwrap();
    common::write_corpus(dir.path());
    let controller = Controller::with_config(common::test_config(dir.path())).unwrap();
    let (service, _mock) = common::mock_service();
    controller.run_generate("de", &service).await.unwrap();
    controller.run_update_hreflang().unwrap();

    let html =
        fs::read_to_string(dir.path().join("docs/en/blog/how-dreams-work.html")).unwrap();
    let doc = Document::parse(&html);
    let hreflangs: Vec<String> = doc
        .find_all_by_tag(doc.root(), "link")
        .into_iter()
        .filter(|&link| doc.attr(link, "rel") == Some("alternate"))
        .map(|link| doc.attr(link, "hreflang").unwrap_or_default().to_string())
        .collect();
    assert_eq!(hreflangs, vec!["en", "fr", "es", "de", "it", "x-default"]);
    assert!(html.contains(r#"href="https://example.com/de/blog/de-how-dreams-work""#));
}

#[tokio::test]
async fn test_updateHreflang_withLocalizedDocument_shouldResolveKeyFromAlternates() {
    let dir = tempfile::tempdir().unwrap();
    common::write_corpus(dir.path());
    let controller = Controller::with_config(common::test_config(dir.path())).unwrap();
    let (service, _mock) = common::mock_service();
    controller.run_generate("de", &service).await.unwrap();
    controller.run_update_hreflang().unwrap();

    // The German document is keyed by its English article, not its own
    // file name, so its alternates still point at every sibling.
    let html =
        fs::read_to_string(dir.path().join("docs/de/blog/de-night-terrors.html")).unwrap();
    assert!(html.contains(r#"hreflang="en" href="https://example.com/en/blog/night-terrors""#));
    assert!(html.contains(r#"hreflang="de" href="https://example.com/de/blog/de-night-terrors""#));
}

#[tokio::test]
async fn test_updateSitemap_withUnchangedRegistry_shouldBeByteIdempotent() {
    let dir = tempfile::tempdir().unwrap();
    common::write_corpus(dir.path());
    let controller = Controller::with_config(common::test_config(dir.path())).unwrap();
    let (service, _mock) = common::mock_service();
    controller.run_extract(&service).await.unwrap();

    controller.run_update_sitemap().unwrap();
    let first = fs::read_to_string(dir.path().join("docs/sitemap.xml")).unwrap();

    controller.run_update_sitemap().unwrap();
    let second = fs::read_to_string(dir.path().join("docs/sitemap.xml")).unwrap();

    assert_eq!(first, second);
    // Managed blocks present, unmanaged entry preserved.
    assert!(first.contains("<loc>https://example.com/en/blog/how-dreams-work</loc>"));
    assert!(first.contains("<loc>https://example.com/en/symbols/wolf</loc>"));
    assert!(first.contains("<lastmod>2024-01-01</lastmod>"));
}

#[tokio::test]
async fn test_updateSitemap_withoutRegistry_shouldFail() {
    let dir = tempfile::tempdir().unwrap();
    common::write_corpus(dir.path());
    let controller = Controller::with_config(common::test_config(dir.path())).unwrap();

    let error = controller.run_update_sitemap().unwrap_err();
    assert!(error.to_string().contains("extract"));
}

/// Collect every file under a directory with its content
fn snapshot(root: &Path) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    collect(root, root, &mut entries);
    entries.sort();
    entries
}

fn collect(root: &Path, dir: &Path, entries: &mut Vec<(String, String)>) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return;
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(root, &path, entries);
        } else {
            let relative = path.strip_prefix(root).unwrap().to_string_lossy().to_string();
            entries.push((relative, fs::read_to_string(&path).unwrap()));
        }
    }
}
