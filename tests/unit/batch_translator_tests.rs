/*!
 * Tests for marker-based batch translation of document regions
 */

use weblingo::document::Document;
use weblingo::translation::BatchTranslator;

use crate::common;

#[tokio::test]
async fn test_translateRegion_withSimpleContent_shouldTranslateEveryLeaf() {
    let (service, _mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse("<article><h1>How Dreams Work</h1><p>Dreams are mysterious.</p></article>");
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_region(&mut doc, article, "en", "de")
        .await
        .unwrap();

    assert_eq!(
        doc.serialize(),
        "<article><h1>[de] How Dreams Work</h1><p>[de] Dreams are mysterious.</p></article>"
    );
}

#[tokio::test]
async fn test_translateRegion_withWhitespaceFrames_shouldReattachThem() {
    let (service, _mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse("<article><p>\n      Dreams are mysterious.\n    </p></article>");
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_region(&mut doc, article, "en", "de")
        .await
        .unwrap();

    assert_eq!(
        doc.serialize(),
        "<article><p>\n      [de] Dreams are mysterious.\n    </p></article>"
    );
}

#[tokio::test]
async fn test_translateRegion_withExcludedElements_shouldLeaveThemUntouched() {
    let (service, _mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse(
        "<article><p>Visible text.</p><pre><code>let dream = true;</code></pre></article>",
    );
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_region(&mut doc, article, "en", "de")
        .await
        .unwrap();

    let html = doc.serialize();
    assert!(html.contains("[de] Visible text."));
    assert!(html.contains("<code>let dream = true;</code>"));
}

#[tokio::test]
async fn test_translateRegion_withSmallBudget_shouldSplitIntoMultipleRequests() {
    let (service, mock) = common::mock_service();
    // Each marker is 24 chars of wrapping plus a 20-char core, so a
    // 60-char budget forces a flush before every second marker.
    let translator = BatchTranslator::new(&service, 60);
    let mut doc = Document::parse(
        "<article><h1>First sentence here.</h1><p>Other sentence here.</p><p>Third sentence here.</p></article>",
    );
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_region(&mut doc, article, "en", "de")
        .await
        .unwrap();

    assert!(mock.request_count() >= 2, "expected the batch to split");
    assert_eq!(
        doc.serialize(),
        "<article><h1>[de] First sentence here.</h1><p>[de] Other sentence here.</p><p>[de] Third sentence here.</p></article>"
    );
}

#[tokio::test]
async fn test_translateRegion_withLargeBudget_shouldUseOneRequest() {
    let (service, mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse("<article><p>First one.</p><p>Second one.</p></article>");
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_region(&mut doc, article, "en", "de")
        .await
        .unwrap();

    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_translateRegion_withRecurringSegments_shouldReuseTheCache() {
    let (service, mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);

    let mut first = Document::parse("<article><p>Repeated phrase.</p></article>");
    let scope = first.find_by_tag(first.root(), "article").unwrap();
    translator
        .translate_region(&mut first, scope, "en", "de")
        .await
        .unwrap();
    let calls_after_first = mock.request_count();

    let mut second = Document::parse("<article><p>Repeated phrase.</p></article>");
    let scope = second.find_by_tag(second.root(), "article").unwrap();
    translator
        .translate_region(&mut second, scope, "en", "de")
        .await
        .unwrap();

    assert_eq!(mock.request_count(), calls_after_first);
    assert!(second.serialize().contains("[de] Repeated phrase."));
}

#[tokio::test]
async fn test_translateAttributes_withTextBearingAttributes_shouldTranslateThem() {
    let (service, _mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse(
        r#"<article><img src="/img/dream.png" alt="A dreaming person" aria-label="Dream image"><span title="Hint text">i</span></article>"#,
    );
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_attributes(&mut doc, article, "en", "de")
        .await
        .unwrap();

    let img = doc.find_by_tag(doc.root(), "img").unwrap();
    assert_eq!(doc.attr(img, "alt"), Some("[de] A dreaming person"));
    assert_eq!(doc.attr(img, "aria-label"), Some("[de] Dream image"));
    assert_eq!(doc.attr(img, "src"), Some("/img/dream.png"));
    let span = doc.find_by_tag(doc.root(), "span").unwrap();
    assert_eq!(doc.attr(span, "title"), Some("[de] Hint text"));
}

#[tokio::test]
async fn test_translateAttributes_withRepeatedValues_shouldShareCacheWithText() {
    let (service, mock) = common::mock_service();
    let translator = BatchTranslator::new(&service, 2500);
    let mut doc = Document::parse(
        r#"<article><img src="a.png" alt="Shared label"><img src="b.png" alt="Shared label"></article>"#,
    );
    let article = doc.find_by_tag(doc.root(), "article").unwrap();

    translator
        .translate_attributes(&mut doc, article, "en", "de")
        .await
        .unwrap();

    assert_eq!(mock.request_count(), 1);
}
