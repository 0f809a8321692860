/*!
 * Tests for the translation service: caching and the bounded retry policy
 */

use weblingo::errors::{PipelineError, ProviderError};
use weblingo::providers::mock::MockProvider;

use crate::common;

#[tokio::test]
async fn test_translateText_withRepeatedText_shouldCallProviderOnce() {
    let (service, mock) = common::mock_service();

    let first = service.translate_text("Hello world", "en", "de").await.unwrap();
    let second = service.translate_text("Hello world", "en", "de").await.unwrap();

    assert_eq!(first, "[de] Hello world");
    assert_eq!(second, first);
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_translateText_withDifferentTargets_shouldNotShareCacheEntries() {
    let (service, mock) = common::mock_service();

    let de = service.translate_text("Hello", "en", "de").await.unwrap();
    let it = service.translate_text("Hello", "en", "it").await.unwrap();

    assert_eq!(de, "[de] Hello");
    assert_eq!(it, "[it] Hello");
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_translateText_withWhitespaceOnly_shouldPassThroughWithoutCall() {
    let (service, mock) = common::mock_service();

    let result = service.translate_text("  \n  ", "en", "de").await.unwrap();

    assert_eq!(result, "  \n  ");
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translateText_withTransientFailures_shouldRetryUntilSuccess() {
    let (service, mock) = common::mock_service_with(MockProvider::fail_first(2));

    let result = service.translate_text("Hello", "en", "de").await.unwrap();

    assert_eq!(result, "[de] Hello");
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_withRateLimiting_shouldRetry() {
    let (service, mock) = common::mock_service_with(MockProvider::rate_limited(1));

    let result = service.translate_text("Hello", "en", "de").await.unwrap();

    assert_eq!(result, "[de] Hello");
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_translateText_withPersistentFailure_shouldExhaustAttemptCap() {
    let (service, mock) = common::mock_service_with(MockProvider::failing());

    let error = service.translate_text("Hello", "en", "de").await.unwrap_err();

    match error {
        PipelineError::ServiceExhausted { attempts, source } => {
            assert_eq!(attempts, 3);
            assert!(matches!(source, ProviderError::ConnectionError(_)));
        }
        other => panic!("expected ServiceExhausted, got {}", other),
    }
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translateText_withUnsupportedPair_shouldFailWithoutRetrying() {
    let (service, mock) = common::mock_service_with(MockProvider::unsupported_pair());

    let error = service.translate_text("Hello", "en", "xx").await.unwrap_err();

    match error {
        PipelineError::Provider(ProviderError::UnsupportedLanguagePair { source_lang, target }) => {
            assert_eq!(source_lang, "en");
            assert_eq!(target, "xx");
        }
        other => panic!("expected unsupported language pair, got {}", other),
    }
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_cacheStats_withHitsAndMisses_shouldTrackRates() {
    let (service, _mock) = common::mock_service();

    service.translate_text("a", "en", "de").await.unwrap();
    service.translate_text("a", "en", "de").await.unwrap();
    service.translate_text("b", "en", "de").await.unwrap();

    let (hits, misses, hit_rate) = service.cache.stats();
    assert_eq!(hits, 1);
    assert_eq!(misses, 2);
    assert!(hit_rate > 0.0 && hit_rate < 1.0);
}
