/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which wraps a
 * translation provider with the per-run cache and a bounded retry policy.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{TranslationConfig, TranslationProviderKind};
use crate::errors::PipelineError;
use crate::providers::google::GoogleTranslate;
use crate::providers::mock::MockProvider;
use crate::providers::TranslationProvider;

use super::cache::TranslationCache;

/// Main translation service for document localization
pub struct TranslationService {
    /// Provider implementation
    provider: Arc<dyn TranslationProvider>,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: &TranslationConfig) -> Self {
        let provider: Arc<dyn TranslationProvider> = match config.provider {
            TranslationProviderKind::Google => Arc::new(GoogleTranslate::new_with_config(
                &config.endpoint,
                config.timeout_secs,
            )),
            TranslationProviderKind::Mock => Arc::new(MockProvider::working()),
        };
        Self::with_provider(provider, config.clone())
    }

    /// Create a translation service around an explicit provider
    ///
    /// This is the seam used to substitute the deterministic mock in tests.
    pub fn with_provider(provider: Arc<dyn TranslationProvider>, config: TranslationConfig) -> Self {
        Self {
            provider,
            config,
            cache: TranslationCache::new(),
        }
    }

    /// Short name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), PipelineError> {
        self.provider
            .test_connection()
            .await
            .map_err(PipelineError::Provider)
    }

    /// Translate a single text string through the cache and retry policy.
    ///
    /// Whitespace-only text passes through untranslated. Transient provider
    /// failures retry with linear backoff up to the configured attempt cap;
    /// permanent failures abort immediately.
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, PipelineError> {
        if text.trim().is_empty() {
            return Ok(text.to_string());
        }

        if let Some(cached) = self.cache.get(text, source_language, target_language) {
            return Ok(cached);
        }

        let mut attempt: u32 = 1;
        loop {
            match self
                .provider
                .translate(text, source_language, target_language)
                .await
            {
                Ok(translated) => {
                    self.cache
                        .store(text, source_language, target_language, &translated);
                    if self.config.request_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.request_delay_ms)).await;
                    }
                    debug!(
                        "Translated {} chars ({} -> {})",
                        text.chars().count(),
                        source_language,
                        target_language
                    );
                    return Ok(translated);
                }
                Err(e) if !e.is_retryable() => {
                    return Err(PipelineError::Provider(e));
                }
                Err(e) => {
                    if attempt >= self.config.retry_count {
                        return Err(PipelineError::ServiceExhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                    let backoff_ms = self.config.retry_backoff_ms * u64::from(attempt);
                    warn!(
                        "Translation attempt {} failed ({}), retrying in {}ms",
                        attempt, e, backoff_ms
                    );
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Clone for TranslationService {
    fn clone(&self) -> Self {
        // Clones share the provider and the per-run cache.
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
            cache: self.cache.clone(),
        }
    }
}
