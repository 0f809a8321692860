use async_trait::async_trait;
use isolang::Language;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

/// Client for the public Google Translate web endpoint
///
/// The endpoint translates HTML-bearing text and needs no API key, which is
/// what makes it usable for bulk document localization.
#[derive(Debug)]
pub struct GoogleTranslate {
    /// Base URL of the translation endpoint
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Google Translate client implementation - some methods are API surface for library consumers
#[allow(dead_code)]
impl GoogleTranslate {
    /// Create a new client with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_config(base_url, 30)
    }

    /// Create a new client with configuration
    pub fn new_with_config(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Validate a language pair before spending a request on it
    fn check_language_pair(source: &str, target: &str) -> Result<(), ProviderError> {
        let valid = |code: &str| code.len() == 2 && Language::from_639_1(code).is_some();
        if !valid(source) || !valid(target) || source == target {
            return Err(ProviderError::UnsupportedLanguagePair {
                source_lang: source.to_string(),
                target: target.to_string(),
            });
        }
        Ok(())
    }

    /// Extract the translated text from the endpoint's nested-array response
    fn extract_translation(body: &str) -> Result<String, ProviderError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("invalid JSON response: {}", e)))?;

        let segments = value
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("missing translation segments".to_string()))?;

        let mut translated = String::new();
        for segment in segments {
            if let Some(piece) = segment.get(0).and_then(Value::as_str) {
                translated.push_str(piece);
            }
        }
        Ok(translated)
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        Self::check_language_pair(source_language, target_language)?;

        let url = format!("{}/translate_a/single", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", source_language),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let truncated: String = message.chars().take(200).collect();
            error!("Translation endpoint returned {}: {}", status, truncated);
            return Err(match status.as_u16() {
                429 => ProviderError::RateLimitExceeded(truncated),
                401 | 403 => ProviderError::AuthenticationError(truncated),
                code => ProviderError::ApiError {
                    status_code: code,
                    message: truncated,
                },
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ParseError(format!("failed to read response body: {}", e)))?;
        Self::extract_translation(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        // The endpoint has no status route; a minimal translation doubles
        // as the connectivity check.
        self.translate("ping", "en", "fr").await.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
